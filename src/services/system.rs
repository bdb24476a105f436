//! System operations: shutdown, restart and sleep

use tokio::process::Command;
use tracing::{info, warn};

use crate::state::SystemActionChoice;

/// Program and arguments performing `choice` on this platform
pub fn system_action_command(choice: SystemActionChoice) -> Option<(&'static str, &'static [&'static str])> {
    match choice {
        SystemActionChoice::None => None,
        #[cfg(target_os = "windows")]
        SystemActionChoice::Shutdown => Some(("shutdown", &["/s", "/t", "1"][..])),
        #[cfg(target_os = "windows")]
        SystemActionChoice::Restart => Some(("shutdown", &["/r", "/t", "1"][..])),
        #[cfg(target_os = "windows")]
        SystemActionChoice::Sleep => Some(("rundll32.exe", &["powrprof.dll,SetSuspendState", "0,1,0"][..])),
        #[cfg(target_os = "macos")]
        SystemActionChoice::Shutdown => Some(("shutdown", &["-h", "now"][..])),
        #[cfg(target_os = "macos")]
        SystemActionChoice::Restart => Some(("shutdown", &["-r", "now"][..])),
        #[cfg(target_os = "macos")]
        SystemActionChoice::Sleep => Some(("pmset", &["sleepnow"][..])),
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        SystemActionChoice::Shutdown => Some(("systemctl", &["poweroff"][..])),
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        SystemActionChoice::Restart => Some(("systemctl", &["reboot"][..])),
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        SystemActionChoice::Sleep => Some(("systemctl", &["suspend"][..])),
    }
}

/// Execute the chosen system action; `dry_run` only logs the command
pub async fn execute_system_action(choice: SystemActionChoice, dry_run: bool) -> Result<(), String> {
    let Some((program, args)) = system_action_command(choice) else {
        info!("System action is none, leaving the machine alone");
        return Ok(());
    };

    if dry_run {
        info!("Dry run: would execute `{} {}`", program, args.join(" "));
        return Ok(());
    }

    info!("Executing system {}", choice);

    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| format!("Failed to execute {}: {}", program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} {} failed: {}", program, args.join(" "), stderr.trim()));
    }

    info!("System {} command executed", choice);
    Ok(())
}

/// Command that succeeds only when `program` can be found
pub fn availability_check_command(program: &'static str) -> (&'static str, Vec<&'static str>) {
    #[cfg(target_os = "windows")]
    return ("where", vec![program]);
    #[cfg(target_os = "macos")]
    return ("which", vec![program]);
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    return (program, vec!["--version"]);
}

/// Check that the program behind `choice` can be launched at all
pub async fn check_system_action_available(choice: SystemActionChoice) -> Result<(), String> {
    let Some((program, _)) = system_action_command(choice) else {
        return Ok(());
    };

    let (checker, args) = availability_check_command(program);
    let unavailable = || format!("{} is not available; system {} will fail", program, choice);

    match Command::new(checker).args(&args).output().await {
        Ok(output) if output.status.success() => {
            info!("{} is available", program);
            Ok(())
        }
        Ok(output) => {
            warn!("`{} {}` exited with {}", checker, args.join(" "), output.status);
            Err(unavailable())
        }
        Err(e) => {
            warn!("{} could not be launched: {}", checker, e);
            Err(unavailable())
        }
    }
}
