//! One-shot "say" command

use std::error::Error;
use std::io;

use crate::cli::chat::write_reveal;
use crate::core::controller::{ChatController, SubmitOutcome};

pub async fn run_say(
    mut controller: ChatController,
    prompt: Vec<String>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: geoai say <prompt>");
        std::process::exit(1);
    }

    let shutdown = controller.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.cancel();
        }
    });

    match controller.submit(&prompt).await {
        SubmitOutcome::Revealing => {
            write_reveal(&mut controller, &mut io::stdout()).await?;
            Ok(())
        }
        _ => {
            let marker = controller
                .messages()
                .last()
                .map(|message| message.text.clone())
                .unwrap_or_default();
            eprintln!("{marker}");
            std::process::exit(1);
        }
    }
}
