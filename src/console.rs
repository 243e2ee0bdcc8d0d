//! Timestamped diagnostics for the launcher.
//!
//! The launcher interleaves its own status lines with the live output of the
//! workflow engine, so diagnostics go through tracing (timestamped by the
//! subscriber) while multi-line banner bodies go straight to stdout.

use tracing::info;

/// Emit a boxed splash line, optionally followed by a verbatim body.
///
/// Mirrors the classic launcher banner:
///
/// ```text
/// ------------------------
/// | Runtime parameters   |
/// ------------------------
/// input: /data/reads
/// ```
pub fn msg_box(splash: &str, body: Option<&str>) {
    let rule = "-".repeat(splash.len() + 4);
    info!("{}", rule);
    info!("| {} |", splash);
    info!("{}", rule);
    if let Some(body) = body {
        println!("\n{}", body.trim_end());
    }
}

/// Emit a single timestamped status line.
pub fn msg(message: &str) {
    info!("{}", message);
}
