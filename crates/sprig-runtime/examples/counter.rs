//! Counter demo: hooks, events, and a cancellable task-driven animation.
//!
//! The animation lives entirely in app code: each task sets one state
//! value and re-schedules itself, so every step gets its own frame, and
//! a ref-held flag cancels the chain.
//!
//! Run with: cargo run -p sprig-runtime --example counter

use anyhow::{Context, Result};
use sprig_runtime::dom::to_html;
use sprig_runtime::{Ctx, Deps, Props, RefHandle, Runtime, SetState, VNode, el, text};

const TOTAL_SEATS: u32 = 6;

fn animate_fill(rt: &Runtime, set_seats: SetState<u32>, cancelled: RefHandle<bool>, seat: u32) {
    if seat > TOTAL_SEATS {
        return;
    }
    let rt_next = rt.clone();
    rt.schedule_task(move || {
        if cancelled.get() {
            return;
        }
        set_seats.set(seat);
        animate_fill(&rt_next, set_seats, cancelled, seat + 1);
    });
}

fn app(ctx: &mut Ctx, _props: &Props) -> VNode {
    let (count, set_count) = ctx.use_state(|| 0);
    let (seats, set_seats) = ctx.use_state(|| 0u32);
    let cancelled = ctx.use_ref(|| false);
    let rt = ctx.runtime();

    ctx.use_effect(Deps::on(count), move || {
        tracing::debug!(count, "count committed");
    });

    el(
        "div",
        Props::new().class("demo"),
        [
            el(
                "button",
                Props::new().attr("id", "inc").on("click", move |_| {
                    set_count.update(|n| n + 1)
                }),
                [text("+1")],
            ),
            el("span", Props::new().attr("id", "count"), [text(count)]),
            el(
                "button",
                Props::new().attr("id", "fill").on("click", {
                    let rt = rt.clone();
                    let set_seats = set_seats.clone();
                    let cancelled = cancelled.clone();
                    move |_| {
                        cancelled.set(false);
                        animate_fill(&rt, set_seats.clone(), cancelled.clone(), 1);
                    }
                }),
                [text("fill")],
            ),
            el(
                "button",
                Props::new().attr("id", "stop").on("click", {
                    let cancelled = cancelled.clone();
                    move |_| cancelled.set(true)
                }),
                [text("stop")],
            ),
            el(
                "span",
                Props::new().attr("id", "seats"),
                [text(format!("{seats}/{TOTAL_SEATS} seats"))],
            ),
        ],
    )
}

fn click(rt: &Runtime, id: &str) -> Result<()> {
    let target = rt
        .with_document(|doc| doc.get_element_by_id(id))
        .with_context(|| format!("no element with id {id}"))?;
    rt.dispatch(target, "click")?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let rt = Runtime::new();
    let container = rt.with_document_mut(|doc| {
        let body = doc.body();
        let container = doc.create_element("div");
        let linked = doc.tree_mut().append_child(body, container);
        debug_assert!(linked.is_ok());
        container
    });

    rt.mount(app, container);
    rt.pump();

    // Three increments in one frame window collapse into one render.
    click(&rt, "inc")?;
    click(&rt, "inc")?;
    click(&rt, "inc")?;
    rt.pump();
    println!("after 3 clicks ({} renders):", rt.render_count());
    println!("  {}", rt.with_document(|doc| to_html(doc.tree(), container)));

    // Starting the fill and stopping before the pump cancels the chain.
    click(&rt, "fill")?;
    click(&rt, "stop")?;
    rt.pump();
    println!("after cancelled fill ({} renders):", rt.render_count());
    println!("  {}", rt.with_document(|doc| to_html(doc.tree(), container)));

    // Left alone, the chain renders one frame per seat.
    click(&rt, "fill")?;
    rt.pump();
    println!("after full fill ({} renders):", rt.render_count());
    println!("  {}", rt.with_document(|doc| to_html(doc.tree(), container)));

    Ok(())
}
