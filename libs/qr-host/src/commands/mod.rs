//! # Commands
//!
//! The two host commands and the glyph they share the pipeline with.

pub mod icon;
pub mod qr_code;
pub mod signboard;

pub use icon::icon_matrix;
pub use qr_code::{generate_qr, QrCodeCommand, QrCodeInputs};
pub use signboard::{BoardInputs, IconInputs, SignboardCommand, SignboardInputs, SignboardQrInputs};

/// Component holding the QR solid.
pub const QR_COMPONENT: &str = "QR_Code";

/// Component holding the signboard backing board.
pub const BOARD_COMPONENT: &str = "Signboard";

/// Component holding the social icon glyph.
pub const ICON_COMPONENT: &str = "Instagram_Icon";
