//! Bitmap assets: clock face, hands and the red button

use std::{
    io::Cursor,
    path::{Path, PathBuf},
};
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageError, ImageFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::frame::{ClockLayout, Size};

/// Hour hand box relative to the scaled face
pub const HOUR_HAND_RATIO: f64 = 0.20;
/// Minute hand box relative to the scaled face
pub const MINUTE_HAND_RATIO: f64 = 0.35;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("required image not found at {0}")]
    Missing(PathBuf),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    #[error("failed to encode {kind:?} as png: {source}")]
    Encode {
        kind: AssetKind,
        #[source]
        source: ImageError,
    },
}

/// The images shutaap draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Clock,
    HourHand,
    MinuteHand,
    RedButton,
}

impl AssetKind {
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Clock,
        AssetKind::HourHand,
        AssetKind::MinuteHand,
        AssetKind::RedButton,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            AssetKind::Clock => "clock.png",
            AssetKind::HourHand => "hour_hand.png",
            AssetKind::MinuteHand => "minute_hand.png",
            AssetKind::RedButton => "red-button.png",
        }
    }

    /// Look an asset up by its URL name (`clock`, `hour_hand`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim_end_matches(".png") {
            "clock" => Some(AssetKind::Clock),
            "hour_hand" => Some(AssetKind::HourHand),
            "minute_hand" => Some(AssetKind::MinuteHand),
            "red_button" | "red-button" => Some(AssetKind::RedButton),
            _ => None,
        }
    }
}

/// Load one image, failing if it does not exist
pub fn load_image(path: &Path) -> Result<DynamicImage, AssetError> {
    if !path.exists() {
        return Err(AssetError::Missing(path.to_path_buf()));
    }

    image::open(path).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Dimensions of `width` x `height` multiplied by `factor`, truncated
pub fn scaled_dimensions(width: u32, height: u32, factor: f64) -> (u32, u32) {
    (
        ((width as f64 * factor) as u32).max(1),
        ((height as f64 * factor) as u32).max(1),
    )
}

/// Resize to fit in `width` x `height`, keeping the aspect ratio
pub fn scale_to_fit(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    image.resize(width.max(1), height.max(1), FilterType::Lanczos3)
}

/// Scaled images ready to draw
#[derive(Debug, Clone)]
pub struct AssetSet {
    face: DynamicImage,
    hour_hand: DynamicImage,
    minute_hand: DynamicImage,
    red_button: DynamicImage,
}

impl AssetSet {
    /// Load and scale every asset from `dir`; any missing image is fatal
    pub fn load(dir: &Path, clock_scale: f64, button_scale: f64) -> Result<Self, AssetError> {
        let load = |kind: AssetKind| {
            let path = dir.join(kind.file_name());
            debug!("Loading {}", path.display());
            load_image(&path)
        };

        let assets = Self::from_images(
            load(AssetKind::Clock)?,
            load(AssetKind::HourHand)?,
            load(AssetKind::MinuteHand)?,
            load(AssetKind::RedButton)?,
            clock_scale,
            button_scale,
        );

        let layout = assets.layout();
        info!(
            "Assets loaded from {}: face {}x{}, button {}x{}",
            dir.display(),
            layout.face.width,
            layout.face.height,
            assets.red_button.width(),
            assets.red_button.height()
        );
        Ok(assets)
    }

    /// Scale already decoded images
    ///
    /// Hands are sized against the unscaled face so they keep their
    /// proportion to it whatever the scale factor.
    pub fn from_images(
        face: DynamicImage,
        hour_hand: DynamicImage,
        minute_hand: DynamicImage,
        red_button: DynamicImage,
        clock_scale: f64,
        button_scale: f64,
    ) -> Self {
        let (face_width, face_height) = face.dimensions();

        let (width, height) = scaled_dimensions(face_width, face_height, clock_scale);
        let scaled_face = scale_to_fit(&face, width, height);

        let (width, height) = scaled_dimensions(face_width, face_height, clock_scale * HOUR_HAND_RATIO);
        let hour_hand = scale_to_fit(&hour_hand, width, height);

        let (width, height) = scaled_dimensions(face_width, face_height, clock_scale * MINUTE_HAND_RATIO);
        let minute_hand = scale_to_fit(&minute_hand, width, height);

        let (width, height) = red_button.dimensions();
        let (width, height) = scaled_dimensions(width, height, button_scale);
        let red_button = scale_to_fit(&red_button, width, height);

        Self {
            face: scaled_face,
            hour_hand,
            minute_hand,
            red_button,
        }
    }

    pub fn get(&self, kind: AssetKind) -> &DynamicImage {
        match kind {
            AssetKind::Clock => &self.face,
            AssetKind::HourHand => &self.hour_hand,
            AssetKind::MinuteHand => &self.minute_hand,
            AssetKind::RedButton => &self.red_button,
        }
    }

    /// Re-encode a scaled asset as PNG
    pub fn encode_png(&self, kind: AssetKind) -> Result<Vec<u8>, AssetError> {
        let mut bytes = Vec::new();
        self.get(kind)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|source| AssetError::Encode { kind, source })?;
        Ok(bytes)
    }

    /// Sizes the render layer positions the hands with
    pub fn layout(&self) -> ClockLayout {
        let size = |image: &DynamicImage| {
            let (width, height) = image.dimensions();
            Size { width, height }
        };

        ClockLayout {
            face: size(&self.face),
            hour_hand: size(&self.hour_hand),
            minute_hand: size(&self.minute_hand),
        }
    }
}
