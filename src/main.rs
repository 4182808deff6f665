//! Member Console - Main Entry Point
//!
//! Headless walkthrough of the members list: mounts a virtual list over the
//! in-memory directory, scrolls it, deletes a row and logs what happened.

use std::time::Duration;

use member_console::components::virtual_list::{ListConfig, ListSettings, ListUpdate, VirtualList};
use member_console::constants::IDLE_WAIT_TIMEOUT_MS;
use member_console::domain::Member;
use member_console::services::MemberDirectory;

fn main() -> anyhow::Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting member console...");

    let settings = ListSettings::load().unwrap_or_else(|e| {
        tracing::warn!("Falling back to default list settings: {}", e);
        ListSettings::default()
    });
    let wait = Duration::from_millis(IDLE_WAIT_TIMEOUT_MS);

    let directory =
        MemberDirectory::with_sample_members(1_250).with_latency(Duration::from_millis(20));
    let config = ListConfig::from_settings(&settings).with_empty_placeholder(Member::placeholder());
    let mut list = VirtualList::mount(directory, config)?;

    // First screen
    let range = list.on_viewport_changed(0.0, settings.viewport_height)?;
    report(&list.wait_idle(wait));
    log_rows(&list, range.lower, range.upper);

    // Jump to the middle of the directory
    let middle = list.content_height() / 2.0;
    let range = list.on_viewport_changed(middle, settings.viewport_height)?;
    report(&list.wait_idle(wait));
    log_rows(&list, range.lower, range.lower + 2);

    // Delete the sixth member on the first screen
    if let Some(id) = list.request_removal(5)? {
        tracing::info!("Requested removal of {}", id);
    }
    report(&list.wait_idle(wait));
    log_rows(&list, 4, 6);

    tracing::info!("List stats: {}", serde_json::to_string(&list.stats())?);

    list.teardown();
    tracing::info!("Member console finished");
    Ok(())
}

fn report(updates: &[ListUpdate<uuid::Uuid>]) {
    for update in updates {
        match update {
            ListUpdate::PageMerged {
                offset,
                received,
                total,
                ..
            } => tracing::info!("Loaded {} members at {} (total {})", received, offset, total),
            ListUpdate::RemovalFailed { error, .. } => {
                tracing::error!("Could not delete member: {}", error)
            }
            other => tracing::debug!("{:?}", other),
        }
    }
}

fn log_rows(list: &VirtualList<MemberDirectory>, lower: usize, upper: usize) {
    for (index, slot) in list.visible_items(lower, upper) {
        match slot.loaded() {
            Some(member) => tracing::info!(
                "#{:<5} {:<12} {:<28} {}",
                index,
                member.name,
                member.email,
                member.tier.label()
            ),
            None => tracing::info!("#{:<5} …", index),
        }
    }
}
