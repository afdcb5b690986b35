use anyhow::Context;
use maptools::{
    prelude::*,
    rendering::memory::{MemoryLayer, MemoryMapView},
};
use std::cell::RefCell;
use std::rc::Rc;

/// Headless walk-through: a tile grid, a dot layer and route arrows on an
/// in-memory engine, driven by scripted pointer events.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => InteractionConfig::from_path(&path)
            .with_context(|| format!("loading interaction config from {}", path))?,
        None => InteractionProfile::Standard.resolve(),
    };
    let mut factory = LayerFactory::new(config);

    let view = MemoryMapView::new(LatLng::new(31.23, 121.47), 12.6, Point::new(1024.0, 768.0));
    let mut tiles =
        factory.tile_layer(MemoryLayer::new(), MemoryLayer::new(), LayerOptions::default());
    let drawn = tiles.redraw_for_view(&view);
    println!(
        "tile grid: {} cells at level {}",
        drawn.len(),
        tiles.level().map(|level| level.get()).unwrap_or_default()
    );

    let route = vec![
        LatLng::new(31.2200, 121.4600),
        LatLng::new(31.2200, 121.4700),
        LatLng::new(31.2300, 121.4700),
    ];
    let mut arrows = factory.arrow_layer(MemoryLayer::new());
    let placed = arrows.redraw(&[Geometry::path("route-1", "link", route.clone())]);
    println!("route arrows: {}", placed);

    let selection = Rc::new(RefCell::new(Vec::<String>::new()));
    let picked = selection.clone();
    let handler = FnHandler::new()
        .on_hover(|geometry, position| {
            match geometry {
                Some(geometry) => println!("hover {} at {:?}", geometry.id, position),
                None => println!("hover cleared"),
            }
            Verdict::Proceed
        })
        .on_click(move |subject, _| {
            if let Some(geometry) = subject.geometry() {
                picked.borrow_mut().push(geometry.id.clone());
            }
            Verdict::Proceed
        })
        .on_double_click(|subject, _| {
            if let Some(geometry) = subject.geometry() {
                println!("double click {}", geometry.id);
            }
            Verdict::Proceed
        });

    let mut markers = MarkerLayer::new(
        factory
            .controller("marker", MemoryLayer::new(), LayerOptions::default())
            .with_handler(handler),
    );
    markers.redraw(vec![
        Geometry::point("pump-1", "pump", route[0]),
        Geometry::point("pump-2", "pump", route[2]),
    ]);
    markers.mark_start_end(route.first().copied(), route.last().copied());

    let surface = factory
        .surface()
        .with_handler(FnHandler::new().on_click(|subject, position| {
            if let ClickSubject::Surface(_) = subject {
                println!("map click at {:?}", position);
            }
            Verdict::Proceed
        }));

    let pump = markers
        .layer()
        .borrow()
        .geometry_by_id("pump-1")
        .context("pump-1 missing from marker layer")?;
    let over_pump = PointerEvent::over(pump, route[0]);

    markers.handle_hover(&over_pump).await;
    markers.handle_click(over_pump.clone()).await;
    surface.handle_click(over_pump).await;
    markers.wait_click_timer().await;

    let picked = selection.borrow().clone();
    markers.selected(picked.as_slice());
    markers
        .handle_hover(&PointerEvent::empty(LatLng::new(31.0, 121.0)))
        .await;

    for geometry in markers.geometries() {
        println!("{} -> {}", geometry.id, geometry.style_id());
    }

    surface
        .handle_click(PointerEvent::empty(LatLng::new(31.0, 121.0)))
        .await;
    surface.wait_click_timer().await;

    tiles.destroy();
    arrows.destroy();
    markers.destroy();
    log::info!("session finished");
    Ok(())
}
