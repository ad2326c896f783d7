//! CLI logic for the Floorplan layout editor.
//!
//! Each invocation loads a layout file, applies one command and writes the
//! layout back. Read-only commands leave the file untouched.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, EntityArg};

use std::{fs, path::Path};

use log::{debug, info};

use floorplan::{
    FloorplanError, LayoutEditor,
    config::AppConfig,
    entity::{EntityType, Floor},
    geometry::Point,
    persist::{EntityRecord, LayoutSnapshot},
    resize::ResizeScope,
};

/// Run the Floorplan CLI application
///
/// This function loads the layout named by `args`, applies the requested
/// command and saves the result.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `FloorplanError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed layout or listing documents
/// - Unknown or duplicate entities
/// - Invalid entity types or floors
pub fn run(args: &Args) -> Result<(), FloorplanError> {
    info!(
        layout_path = args.layout,
        command:? = args.command;
        "Processing layout"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;
    let layout_path = Path::new(&args.layout);

    match &args.command {
        Command::Seed { listing, fresh } => {
            let records = EntityRecord::read_listing(listing)?;
            let cache = if *fresh || !layout_path.exists() {
                None
            } else {
                Some(LayoutSnapshot::read_from(layout_path)?)
            };
            let editor = LayoutEditor::load(app_config, &records, cache.as_ref())?;
            editor.save().write_to(layout_path)?;
        }
        Command::Show { floor } => {
            let editor = open_layout(app_config, layout_path)?;
            let floor = floor.map(Floor::new).transpose()?;
            print!("{}", render_layout(&editor, floor));
        }
        Command::ExportBatch { kind, output } => {
            let editor = open_layout(app_config, layout_path)?;
            let request = editor.batch_update(*kind);
            fs::write(output, request.to_json()?)?;
            info!(
                output_file = output,
                item_count = request.items.len();
                "Batch update exported"
            );
        }
        command => {
            let mut editor = open_layout(app_config, layout_path)?;
            apply_edit(&mut editor, command)?;
            editor.save().write_to(layout_path)?;
        }
    }

    Ok(())
}

/// Opens the layout file, or starts an empty layout if it does not exist.
fn open_layout(config: AppConfig, path: &Path) -> Result<LayoutEditor, FloorplanError> {
    if !path.exists() {
        debug!(path = path.display().to_string(); "Layout file not found, starting empty");
        return Ok(LayoutEditor::new(config));
    }
    LayoutEditor::from_snapshot(config, LayoutSnapshot::read_from(path)?)
}

fn apply_edit(editor: &mut LayoutEditor, command: &Command) -> Result<(), FloorplanError> {
    match command {
        Command::Place {
            entity,
            entity_type,
            floor,
        } => {
            let entity_type = EntityType::parse_for_kind(entity.kind, entity_type)?;
            let rect = editor.place_new(entity.id, entity_type, Floor::new(*floor)?)?;
            info!(key:% = entity.key(), rect:?; "Placed");
        }
        Command::Move { entity, dx, dy } => {
            let key = entity.key();
            let origin = editor
                .store()
                .get_position(key)
                .ok_or(FloorplanError::UnknownEntity(key))?
                .origin();
            editor.drag_end(key, origin, Point::new(*dx, *dy))?;
        }
        Command::Resize {
            entity,
            dw,
            dh,
            same_floor,
            all_floors,
        } => {
            let scope = ResizeScope::from_flags(*same_floor, *all_floors)?;
            resize(editor, entity, Point::new(*dw, *dh), scope)?;
        }
        Command::Rotate { entity } => {
            let degrees = editor.rotate(entity.key())?;
            info!(key:% = entity.key(), degrees; "Rotated");
        }
        Command::Remove { entity } => {
            let key = entity.key();
            editor
                .remove(key)
                .ok_or(FloorplanError::UnknownEntity(key))?;
        }
        Command::Reset => {
            editor.reset_layout();
        }
        Command::Seed { .. } | Command::Show { .. } | Command::ExportBatch { .. } => {}
    }
    Ok(())
}

/// Drives one resize gesture from the entity's bottom-right corner.
fn resize(
    editor: &mut LayoutEditor,
    entity: &EntityArg,
    delta: Point,
    scope: ResizeScope,
) -> Result<(), FloorplanError> {
    let key = entity.key();
    let rect = editor
        .store()
        .get_position(key)
        .ok_or(FloorplanError::UnknownEntity(key))?;
    let handle = Point::new(rect.right(), rect.bottom());

    editor.begin_resize(key)?;
    editor.resize_pointer_down(handle)?;
    editor.resize_pointer_move(handle.add_point(delta))?;

    match editor.resize_release()? {
        Some(pending) => {
            let resized = editor.confirm_resize(scope)?;
            info!(
                key:%,
                scope:?,
                size:? = pending.size(),
                resized_count = resized.len();
                "Resized"
            );
        }
        None => info!(key:%; "Size unchanged after snapping"),
    }
    Ok(())
}

/// Formats the layout as one block per floor.
fn render_layout(editor: &LayoutEditor, only: Option<Floor>) -> String {
    let mut out = String::new();
    for floor in editor.floors() {
        if only.is_some_and(|only| only != floor) {
            continue;
        }
        out.push_str(&format!("{floor}\n"));
        for entity in editor.render_floor(floor) {
            let rect = entity.rect();
            out.push_str(&format!(
                "  {:<14} {:<12} ({}, {}) {}x{} {}°\n",
                entity.key().to_string(),
                entity.entity_type().display_name(),
                rect.left(),
                rect.top(),
                rect.width(),
                rect.height(),
                entity.rotation().degrees()
            ));
        }
    }
    out
}
