use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "qrmatrix")]
#[command(about = "Generate QR codes from text or emoji pixel art of an image", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory where the QR PNG is written
    #[arg(long, short = 'o', global = true)]
    pub output_dir: Option<PathBuf>,

    /// Also copy the QR image to the system clipboard
    #[arg(long, global = true)]
    pub copy: bool,

    /// JSON settings file (defaults are used when it does not exist)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Resample profile: quality, balanced, speed
    #[arg(long, short = 'p', global = true)]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode text directly into a QR code
    Text {
        /// Text to encode
        #[arg(required_unless_present = "stdin", conflicts_with = "stdin")]
        text: Option<String>,

        /// Read text content from stdin
        #[arg(long)]
        stdin: bool,
    },
    /// Turn an image into 15x15 emoji pixel art and encode that into a QR code
    Image {
        /// Path to the source image
        #[arg(required_unless_present = "base64", conflicts_with = "base64")]
        path: Option<PathBuf>,

        /// Base64 or data URL image content
        #[arg(long)]
        base64: Option<String>,
    },
}
