//! `seat-monitor run`

#![cfg_attr(not(feature = "gamepad"), allow(dead_code, unused_imports))]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;
use playerseat_core::{
    GamepadSource, InputConfig, Normalizer, PlayerSlot, RawInputSource, SlotArbiter,
};

use crate::ConfigArgs;

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Number of player slots (1-4)
    #[arg(long)]
    pub players: Option<usize>,

    /// Never move minimal pads out of their slots for full-feature pads
    #[arg(long)]
    pub no_full_preference: bool,

    /// Milliseconds between gamepad polls
    #[arg(long, default_value_t = 8)]
    pub poll_ms: u64,

    /// Stop after this many seconds (runs until interrupted otherwise)
    #[arg(long)]
    pub seconds: Option<u64>,
}

impl RunArgs {
    fn resolve_config(&self) -> Result<InputConfig> {
        let mut config = self.config.load()?;
        if let Some(players) = self.players {
            config.slot_count = players;
        }
        if self.no_full_preference {
            config.prefer_full_feature = false;
        }
        config.validate()?;
        Ok(config)
    }
}

/// One logging normalizer per configured slot
fn spawn_players(config: &InputConfig, source: &Arc<dyn RawInputSource>) -> Vec<Normalizer> {
    PlayerSlot::first(config.slot_count)
        .map(|slot| {
            let player = Normalizer::for_slot(source.clone(), slot)
                .with_direction_threshold(config.direction_threshold);
            player.observe_key_set(move |keys| tracing::info!(%slot, ?keys, "Keys"));
            player.observe_axis(move |axis| tracing::debug!(%slot, x = axis.x, y = axis.y, "Axis"));
            player.observe_connection_state(move |state| {
                if state.message().is_empty() {
                    tracing::info!(%slot, "All controllers connected");
                } else {
                    tracing::info!(%slot, "{}", state.message());
                }
            });
            player
        })
        .collect()
}

#[cfg(feature = "gamepad")]
pub fn execute(args: RunArgs) -> Result<()> {
    use playerseat_core::backend::GilrsBackend;

    let config = args.resolve_config()?;
    tracing::info!(
        slots = config.slot_count,
        prefer_full_feature = config.prefer_full_feature,
        "Starting seat monitor"
    );

    let arbiter = Arc::new(SlotArbiter::from_config(&config));
    let source: Arc<dyn RawInputSource> = Arc::new(GamepadSource::new(arbiter.clone()));
    let players = spawn_players(&config, &source);

    let mut backend = GilrsBackend::from_config(&config)?;
    for event in backend.scan() {
        arbiter.apply(&event);
    }

    let deadline = args
        .seconds
        .map(|secs| Instant::now() + Duration::from_secs(secs));
    let interval = Duration::from_millis(args.poll_ms.max(1));

    while deadline.is_none_or(|deadline| Instant::now() < deadline) {
        for event in backend.poll() {
            let Some(raw) = arbiter.apply(&event) else {
                continue;
            };
            if !players.iter().any(|player| player.handle(&raw).is_consumed()) {
                tracing::trace!(?raw, "Unclaimed input");
            }
        }
        std::thread::sleep(interval);
    }

    for (slot, device) in arbiter.bindings() {
        tracing::info!(%slot, %device, "Final binding");
    }
    Ok(())
}

#[cfg(not(feature = "gamepad"))]
pub fn execute(args: RunArgs) -> Result<()> {
    let _ = args.resolve_config()?;
    anyhow::bail!("seat-monitor was built without gamepad support")
}
