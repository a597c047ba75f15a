/// Example: Driving the image tools the way an agent would
///
/// Runs the three image tools against one session, using URLs passed on the
/// command line (or the IMGKIT_DEMO_URLS variable).
///
/// This example demonstrates:
/// - Loading configuration from the environment
/// - Building the image tool set and a Runner
/// - Feeding tool calls and printing the JSON reports
use anyhow::Result;
use imgkit_core::logging::init_stdout_logging;
use imgkit_core::prelude::*;
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    init_stdout_logging("info")?;

    // 1. Configure tools
    let config = ImageToolsConfig::from_env()?;
    let tools = image_tools(&config, Some(Arc::new(TracingDisplay)))?;
    let runner = Runner::new(tools);

    println!("🧰 Tools:");
    for def in runner.tools().definitions().await {
        println!("  - {}: {}", def.name, def.description);
    }

    // 2. Download
    let urls: Vec<String> = std::env::args().skip(1).collect();
    let urls = if urls.is_empty() {
        std::env::var("IMGKIT_DEMO_URLS").unwrap_or_default()
    } else {
        urls.join(",")
    };

    let session = runner.create_session();
    let calls = vec![
        ToolCall::new("1", "scrape_images_from_urls", json!({ "image_urls": urls })),
        ToolCall::new("2", "display_downloaded_images", json!({})),
    ];
    for output in runner.run_tool_calls(&session, &calls).await {
        println!("📨 {} -> {}", output.name, output.content);
    }

    // 3. Publish the first downloaded image
    let state = runner.sessions().snapshot(&session).await?;
    let first = state
        .images()
        .and_then(|images| images.keys().next().cloned());
    if let Some(filename) = first {
        let out = runner
            .call_tool(
                &session,
                "save_image_as_artifact",
                &json!({ "image_filename": filename }).to_string(),
            )
            .await?;
        println!("💾 {}", out);
    } else {
        println!("No images downloaded; pass image URLs as arguments");
    }

    Ok(())
}
