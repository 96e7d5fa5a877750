//! Scripted headless session. Run with `RUST_LOG=debug` to watch the
//! overlay lifecycle and scrim fade.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{Context, bail, ensure};
use drape_core::{Callback, Host, ManualClock, Modifier, Scope, Size, Vec2, View, compose, signal};
use drape_platform::headless::{HeadlessWindow, headless_host};
use drape_platform::{
    AppInfo, JsonFileReviewStore, Platform, RequestReview, ReviewOutcome, WindowRegistry,
    is_preview_mode,
};
use drape_ui::scroll::{ScrollState, TrackedScrollArea, report_scroll_offsets};
use drape_ui::{
    AlertButtonSpec, AlertSpec, Button, Column, DismissHandle, OverlayConfig, OverlayState,
    ScrollOffsetChannel, Text, ViewExt, custom_alert, find_first, present_overlay, show_alert,
    track_scroll_offset, trigger_view_by_id,
};

fn drive(clock: &ManualClock, host: &Host, ms: u64) {
    for _ in 0..ms.div_ceil(4) {
        clock.advance(std::time::Duration::from_millis(4));
        host.timers.run_due();
    }
}

fn sheet(close: &DismissHandle) -> View {
    let close = close.clone();
    Column(Modifier::new().padding(16.0)).child((
        Text("Settings"),
        Button("Done", move || close.dismiss()).identifier("done"),
    ))
}

fn sheet_session(clock: &ManualClock, window: &HeadlessWindow, host: &Host) -> anyhow::Result<()> {
    let show = signal(false);
    let closed = Rc::new(Cell::new(0));
    let on_dismiss: Callback = {
        let closed = closed.clone();
        Rc::new(move || closed.set(closed.get() + 1))
    };
    let binding = present_overlay(host, &show, OverlayConfig::default(), sheet, Some(on_dismiss));

    show.set(true);
    drive(clock, host, 600);
    ensure!(binding.state() == OverlayState::Open, "sheet did not open");
    log::info!("sheet open at {:?}", binding.resolved_size());

    let scrim = window.last_container().context("no scrim container")?;
    log::info!("scrim written {} times", scrim.write_count());

    let screen = binding.render(Text("Home"));
    ensure!(trigger_view_by_id(&screen, "done"), "done button not found");
    drive(clock, host, 300);
    ensure!(closed.get() == 1 && !show.get(), "sheet did not close");

    let trigger = signal(true);
    let card = custom_alert(host, &trigger, |close| {
        let close = close.clone();
        Button("Dismiss", move || close.dismiss())
    });
    drive(clock, host, 300);
    log::info!("custom alert is {:?}", card.state());
    card.presenter().dismiss_by_gesture();
    drive(clock, host, 300);
    ensure!(card.state() == OverlayState::Closed, "custom alert stuck");
    Ok(())
}

fn alert_session() -> anyhow::Result<()> {
    let deleted = Rc::new(Cell::new(false));
    let spec = AlertSpec::new("Delete draft?")
        .message("This cannot be undone.")
        .button(AlertButtonSpec::cancel())
        .button(AlertButtonSpec::destructive("Delete", {
            let deleted = deleted.clone();
            move || deleted.set(true)
        }));
    let shown = signal(true);
    let screen = show_alert(Text("Drafts"), &spec, &shown);

    let dialog = find_first(&screen, &|v: &View| v.identifier_str() == Some("alert"))
        .context("alert not rendered")?;
    log::info!("alert:\n{}", dialog.outline());

    if !trigger_view_by_id(&screen, "Delete") {
        bail!("delete button not reachable");
    }
    ensure!(deleted.get() && !shown.get(), "alert action did not dismiss");
    Ok(())
}

fn scroll_session() -> anyhow::Result<()> {
    let scope = Scope::new();
    let channel = ScrollOffsetChannel::new();
    let seen = Rc::new(Cell::new(Vec2::ZERO));
    let state = Rc::new(ScrollState::new());
    state.set_viewport(320.0, 480.0);
    state.set_content(320.0, 2000.0);

    let root = compose(&scope, || {
        let seen = seen.clone();
        let _tracking = track_scroll_offset(&channel, "feed", move |offset: Vec2| seen.set(offset));
        TrackedScrollArea(Modifier::new(), "feed", state.clone(), Text("rows"))
    });

    for y in [0.0, 120.0, 120.0, 640.0] {
        state.set_offset(0.0, y);
        report_scroll_offsets(&root, &channel);
        channel.flush();
    }
    log::info!("feed origin at {:?}", seen.get());
    ensure!(seen.get() == Vec2::new(0.0, -640.0), "offset not delivered");

    scope.dispose();
    ensure!(channel.observer_count() == 0, "tracking outlived its scope");
    Ok(())
}

fn review_session() -> anyhow::Result<()> {
    let dir = std::env::temp_dir().join("drape-overlay-demo");
    let store = JsonFileReviewStore::new(dir.join("review.json"));
    let app = AppInfo::new(Some("org.drape.overlay-demo"), "0.1.0", "1");
    log::info!("{}", app.current_version());

    let mut windows = WindowRegistry::new();
    let main = windows.open("main");
    windows.make_key(main)?;

    let review = RequestReview::new(store, app);
    match review.show_review_if_needed(&windows, |w| log::info!("review prompt on {w:?}"))? {
        ReviewOutcome::Counting(n) => log::info!("run {n} toward the review prompt"),
        other => log::info!("review: {other:?}"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("platform {}, preview {}", Platform::current(), is_preview_mode());

    let (clock, window, host) = headless_host(Size::new(1024.0, 768.0));
    sheet_session(&clock, &window, &host)?;
    alert_session()?;
    scroll_session()?;
    review_session()?;
    log::info!("all sessions passed");
    Ok(())
}
