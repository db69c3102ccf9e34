//! Example driving a bar through a simulated route change

use color_eyre::Result;
use slimbar::{Document, MemoryDocument, Options, SlimBar};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // A page with a header the bar should live in
    let document = Arc::new(MemoryDocument::with_body(
        r#"<header id="top"></header><main id="content"></main>"#,
    )?);

    let bar = SlimBar::new(document.clone());
    bar.configure(
        Options::new()
            .parent("#top")
            .speed(150)
            .trickle_speed(120)
            .show_spinner(false),
    );

    // Navigation begins
    bar.start();
    for _ in 0..5 {
        tokio::time::sleep(Duration::from_millis(125)).await;
        print_state("loading", &document, &bar)?;
    }

    // Page data arrived halfway through
    bar.set(0.7);
    print_state("data received", &document, &bar)?;

    // Navigation finished
    bar.done();
    print_state("done", &document, &bar)?;

    tokio::time::sleep(Duration::from_millis(200)).await;
    print_state("fading", &document, &bar)?;

    tokio::time::sleep(Duration::from_millis(150)).await;
    print_state("removed", &document, &bar)?;

    Ok(())
}

fn print_state(label: &str, document: &MemoryDocument, bar: &SlimBar) -> Result<()> {
    let status = match bar.status() {
        Some(status) => format!("{:>5.1}%", status * 100.0),
        None => "  idle".to_string(),
    };
    let html_class = document
        .attribute(document.document_element(), "class")
        .unwrap_or_default();

    match document.query(".slimbar")? {
        Some(container) => {
            let bar_style = document
                .query_within(container, ".bar")?
                .and_then(|node| document.attribute(node, "style"))
                .unwrap_or_default();
            let container_style = document.attribute(container, "style").unwrap_or_default();
            println!(
                "{label:<14} {status}  html[{html_class}]  container[{container_style}]  bar[{bar_style}]"
            );
        }
        None => println!("{label:<14} {status}  html[{html_class}]  (not mounted)"),
    }
    Ok(())
}
