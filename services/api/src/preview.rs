use clap::Args;
use freight_quote::error::AppError;
use freight_quote::quotes::{notify, validate, SubmissionContext};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// JSON file shaped like the web form payload
    #[arg(long)]
    pub(crate) file: PathBuf,
}

pub(crate) fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let raw = std::fs::read(&args.file)?;
    let payload: serde_json::Value = serde_json::from_slice(&raw)?;
    println!("{}", render_preview(&payload));
    Ok(())
}

/// Plain-text notification for a valid payload, or the validation report.
pub(crate) fn render_preview(payload: &serde_json::Value) -> String {
    match validate(payload) {
        Ok(request) => {
            let context = SubmissionContext::now(None);
            notify::render(&request, &context.submitted_at_iso()).text
        }
        Err(errors) => {
            let mut report = String::from("Quote request rejected:");
            for message in errors.messages() {
                report.push_str("\n- ");
                report.push_str(message);
            }
            report
        }
    }
}
