//! Example: Laying out a floor and resizing every room of a type
//!
//! This example places a few rooms and facilities on two floors, resizes
//! one double room and applies the new size to every double room on its
//! floor, then prints the bulk update payload for rooms.

use floorplan::{
    LayoutEditor,
    config::AppConfig,
    entity::{EntityKey, EntityKind, FacilityType, Floor, RoomType},
    geometry::Point,
    resize::ResizeScope,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut editor = LayoutEditor::new(AppConfig::default());
    let second = Floor::new(2)?;
    let third = Floor::new(3)?;

    // Place entities; each lands in the first free slot of its floor
    for id in 1..=3 {
        editor.place_new(id, RoomType::Double, second)?;
    }
    editor.place_new(4, RoomType::Double, third)?;
    editor.place_new(1, FacilityType::Elevator, second)?;

    // Drag the elevator to the bottom-right area
    let elevator = EntityKey::facility(1);
    if let Some(rect) = editor.store().get_position(elevator) {
        editor.drag_end(elevator, rect.origin(), Point::new(503, 397))?;
    }

    // Resize room 1 by one grid cell in each direction
    let room = EntityKey::room(1);
    editor.begin_resize(room)?;
    editor.resize_pointer_down(Point::new(140, 120))?;
    editor.resize_pointer_move(Point::new(160, 140))?;

    if let Some(pending) = editor.resize_release()? {
        println!(
            "Resizing {} {} to {}x{}",
            pending.floor(),
            pending.entity_type(),
            pending.size().width(),
            pending.size().height()
        );
        let resized = editor.confirm_resize(ResizeScope::SameFloorAndType)?;
        println!("Applied to {} entities", resized.len());
    }

    for floor in editor.floors() {
        println!("\n{floor}:");
        for entity in editor.render_floor(floor) {
            let rect = entity.rect();
            println!(
                "  {:<12} {:<6} at ({}, {}) size {}x{}",
                entity.key().to_string(),
                entity.entity_type().to_string(),
                rect.left(),
                rect.top(),
                rect.width(),
                rect.height()
            );
        }
    }

    println!("\n{}", editor.batch_update(EntityKind::Room).to_json()?);
    Ok(())
}
