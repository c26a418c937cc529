use std::path::PathBuf;
use std::time::Duration;

use crate::core::{
    config::{ConfigManager, Settings},
    coordinator::Coordinator,
    feeds::FeedWatcher,
    model::Contact,
    outbox::FileOutbox,
    speech::{SpeechSignal, SpeechSupervisor},
};

fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SAFEGUARD_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".config/safeguard")
}

fn build_coordinator(settings: &Settings) -> Coordinator {
    let mut coordinator = Coordinator::new(
        settings.fall.clone(),
        settings.alert.clone(),
        &settings.keywords,
    );
    coordinator.set_sos_enabled(settings.sos_enabled);
    coordinator.set_voice_automation(settings.voice_automation);
    coordinator.set_contact(settings.contact.as_deref().and_then(Contact::new));
    coordinator
}

pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_manager = ConfigManager::new(config_dir());
    let mut settings = config_manager.load();

    let rt = tokio::runtime::Runtime::new().expect("error starting async runtime");
    rt.block_on(async move {
        let mut coordinator = build_coordinator(&settings);
        let mut outbox = FileOutbox::new(settings.outbox_path.clone());

        let (mut feeds, messages) = FeedWatcher::attach(&settings.trace_dir);
        for message in messages {
            log::info!("{message}");
        }

        let mut supervisor = SpeechSupervisor::new();
        supervisor.set_automation(settings.voice_automation, &mut feeds);

        log::info!("Monitoring started. Trace dir: {:?}", settings.trace_dir);

        loop {
            // Hot-reload settings; toggles go through the named setters
            let fresh = config_manager.load();
            if fresh != settings {
                if fresh.trace_dir != settings.trace_dir {
                    feeds.detach();
                    let (new_feeds, messages) = FeedWatcher::attach(&fresh.trace_dir);
                    feeds = new_feeds;
                    for message in messages {
                        log::info!("{message}");
                    }
                    log::info!("Trace dir changed to {:?}", fresh.trace_dir);
                }
                if fresh.sos_enabled != settings.sos_enabled {
                    coordinator.set_sos_enabled(fresh.sos_enabled);
                    log::info!(
                        "SOS alerts {}",
                        if fresh.sos_enabled { "enabled" } else { "disabled" }
                    );
                }
                if fresh.voice_automation != settings.voice_automation {
                    coordinator.set_voice_automation(fresh.voice_automation);
                    supervisor.set_automation(fresh.voice_automation, &mut feeds);
                    log::info!(
                        "Voice automation {}",
                        if fresh.voice_automation {
                            "enabled"
                        } else {
                            "disabled"
                        }
                    );
                }
                if fresh.contact != settings.contact {
                    coordinator.set_contact(fresh.contact.as_deref().and_then(Contact::new));
                    log::info!("Contact updated");
                }
                if fresh.outbox_path != settings.outbox_path {
                    outbox = FileOutbox::new(fresh.outbox_path.clone());
                }
                settings = fresh;
            }

            let mut batch = feeds.poll();

            // Transcripts arrive as a terminal Results callback; the
            // supervisor re-arms the session before they are matched.
            if !batch.transcripts.is_empty() {
                batch.transcripts =
                    supervisor.handle(SpeechSignal::Results(batch.transcripts), &mut feeds);
            }

            let output = coordinator.tick(&batch, &mut outbox);
            for notice in &output.notices {
                log::warn!("{notice}");
            }
            for alert in &output.alerts {
                log::info!("SOS alert ({}) sent to {}: {}", alert.cause, alert.number, alert.body);
            }

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    // Teardown: unregister the feeds and end the speech session
                    supervisor.set_automation(false, &mut feeds);
                    feeds.detach();
                    log::info!("Monitoring stopped");
                    break;
                }
                _ = tokio::time::sleep(Duration::from_millis(settings.tick_ms)) => {}
            }
        }
    });
}
