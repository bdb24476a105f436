//! Sound effects and the audio output they play on
//!
//! `rodio`'s output stream is not `Send`, so it lives on a dedicated thread.
//! [`AudioOutput`] is the cloneable, thread-safe handle to it: requests are
//! queued and never wait for the audio device.

use std::{
    fmt,
    fs::File,
    io::{BufReader, Read, Seek},
    path::{Path, PathBuf},
    sync::mpsc as std_mpsc,
    thread,
    time::Duration,
};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Named sound effects the countdown can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundId {
    Ticking,
    Countdown,
    Alarm,
    BombBeeps,
    Explosion,
}

impl SoundId {
    /// File name of the effect inside the sounds directory
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundId::Ticking => "ticking-clock-sound.mp3",
            SoundId::Countdown => "countdown.mp3",
            SoundId::Alarm => "alarm.mp3",
            SoundId::BombBeeps => "bomb-beeps.mp3",
            SoundId::Explosion => "explode.mp3",
        }
    }

    pub fn path_in(&self, sounds_dir: &Path) -> PathBuf {
        sounds_dir.join(self.file_name())
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SoundId::Ticking => "ticking",
            SoundId::Countdown => "countdown",
            SoundId::Alarm => "alarm",
            SoundId::BombBeeps => "bomb-beeps",
            SoundId::Explosion => "explosion",
        };
        f.write_str(name)
    }
}

/// A decoded effect ready to be appended to a sink
pub type EffectSource = Box<dyn Source<Item = i16> + Send>;

/// Decode `reader`, either looping forever or starting `seek_seconds` in
pub fn decode_effect<R>(reader: R, looping: bool, seek_seconds: u64) -> Result<EffectSource, String>
where
    R: Read + Seek + Send + Sync + 'static,
{
    let decoder = Decoder::new(reader).map_err(|e| format!("Failed to decode sound: {}", e))?;

    if looping {
        return Ok(Box::new(decoder.repeat_infinite()));
    }
    if seek_seconds > 0 {
        return Ok(Box::new(decoder.skip_duration(Duration::from_secs(seek_seconds))));
    }
    Ok(Box::new(decoder))
}

enum AudioCommand {
    Play {
        sound: SoundId,
        path: PathBuf,
        looping: bool,
        seek_seconds: u64,
    },
    StopAll,
}

/// Handle to the audio thread
#[derive(Debug, Clone)]
pub struct AudioOutput {
    commands: mpsc::UnboundedSender<AudioCommand>,
}

impl fmt::Debug for AudioCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioCommand::Play { sound, .. } => write!(f, "Play({})", sound),
            AudioCommand::StopAll => f.write_str("StopAll"),
        }
    }
}

impl AudioOutput {
    /// Open the default output device on its own thread
    ///
    /// Fails when there is no usable device. The thread exits once every
    /// handle has been dropped.
    pub fn open() -> Result<Self, String> {
        let (commands, mut requests) = mpsc::unbounded_channel::<AudioCommand>();
        let (ready_tx, ready_rx) = std_mpsc::channel::<Result<(), String>>();

        thread::Builder::new()
            .name("shutaap-audio".to_string())
            .spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(output) => {
                        let _ = ready_tx.send(Ok(()));
                        output
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(format!("No audio output device: {}", e)));
                        return;
                    }
                };

                let mut sinks: Vec<(SoundId, Sink)> = Vec::new();
                while let Some(command) = requests.blocking_recv() {
                    sinks.retain(|(_, sink)| !sink.empty());

                    match command {
                        AudioCommand::Play { sound, path, looping, seek_seconds } => {
                            match start_sink(&handle, &path, looping, seek_seconds) {
                                Ok(sink) => sinks.push((sound, sink)),
                                Err(e) => warn!("Could not play {}: {}", sound, e),
                            }
                        }
                        AudioCommand::StopAll => {
                            for (sound, sink) in sinks.drain(..) {
                                debug!("Stopping {}", sound);
                                sink.stop();
                            }
                        }
                    }
                }

                debug!("Audio thread exiting");
            })
            .map_err(|e| format!("Failed to start audio thread: {}", e))?;

        ready_rx
            .recv()
            .map_err(|e| format!("Audio thread exited before opening a device: {}", e))??;

        info!("Audio output opened");
        Ok(Self { commands })
    }

    /// Queue `path` for playback
    pub fn play(&self, sound: SoundId, path: PathBuf, looping: bool, seek_seconds: u64) -> Result<(), String> {
        self.send(AudioCommand::Play { sound, path, looping, seek_seconds })
    }

    /// Stop every sink that is still playing
    pub fn stop_all(&self) -> Result<(), String> {
        self.send(AudioCommand::StopAll)
    }

    fn send(&self, command: AudioCommand) -> Result<(), String> {
        self.commands
            .send(command)
            .map_err(|e| format!("Audio thread has stopped, dropped {:?}", e.0))
    }
}

fn start_sink(handle: &OutputStreamHandle, path: &Path, looping: bool, seek_seconds: u64) -> Result<Sink, String> {
    let file = File::open(path).map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;
    let source = decode_effect(BufReader::new(file), looping, seek_seconds)?;

    let sink = Sink::try_new(handle).map_err(|e| format!("Failed to create sink: {}", e))?;
    sink.append(source);
    Ok(sink)
}
