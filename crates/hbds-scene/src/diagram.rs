//! Diagram assembly
//!
//! Every class card is spawned under one shared `DiagramRoot`. A card owns
//! its parts: the mesh children, the overlay labels (UI nodes, which are not
//! part of the transform hierarchy), and every mesh and material asset it
//! created. Replacing the `DiagramDocument` tears the old cards down and
//! releases those assets before the new cards are spawned.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::Indices;
use bevy::prelude::*;
use bevy::render::render_resource::PrimitiveTopology;
use bevy_picking::Pickable;
use hbds_core::bounds::recenter_offset;
use hbds_core::geometry::extrude;
use hbds_core::layout::{Body, ClassGraphic, Label, PartKind, Pickability};
use hbds_core::Aabb;

use crate::labels::OverlayLabel;
use crate::types::{to_color, DiagramBounds, DiagramDocument, DiagramLayout, DragState};

/// Shared container of all class cards
#[derive(Component)]
pub struct DiagramRoot;

/// Root of one class card; owns everything spawned for the card
#[derive(Component, Debug)]
pub struct ClassCard {
    pub class_id: serde_json::Number,
    pub name: String,
    /// The body; the only pickable part
    pub handle: Entity,
    /// All parts in layout order, labels included
    pub parts: Vec<Entity>,
    /// Overlay label nodes (title first)
    pub labels: Vec<Entity>,
    pub meshes: Vec<Handle<Mesh>>,
    pub materials: Vec<Handle<StandardMaterial>>,
    /// Card-local geometry bounds
    pub local_bounds: Aabb,
}

/// Marks the drag handle of a card
#[derive(Component, Debug, Clone, Copy)]
pub struct CardHandle {
    pub card: Entity,
}

/// Kind of card part an entity renders
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardPart(pub PartKind);

/// Plugin for building class cards from the current document
pub struct DiagramPlugin;

impl Plugin for DiagramPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DiagramDocument>()
            .init_resource::<DiagramLayout>()
            .init_resource::<DiagramBounds>()
            .init_resource::<DragState>()
            .add_systems(Update, rebuild_diagram);
    }
}

pub fn pickable(pickability: Pickability) -> Pickable {
    match pickability {
        Pickability::Handle => Pickable::default(),
        Pickability::Ignored => Pickable::IGNORE,
    }
}

/// Tear down the previous diagram and build the current document
#[allow(clippy::too_many_arguments)]
fn rebuild_diagram(
    mut commands: Commands,
    diagram: Res<DiagramDocument>,
    layout: Res<DiagramLayout>,
    mut bounds: ResMut<DiagramBounds>,
    mut drag: ResMut<DragState>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    roots: Query<Entity, With<DiagramRoot>>,
    cards: Query<&ClassCard>,
) {
    if !diagram.is_changed() && !layout.is_changed() {
        return;
    }

    for card in cards.iter() {
        release_card(&mut commands, card, &mut meshes, &mut materials);
    }
    for root in roots.iter() {
        commands.entity(root).despawn();
    }
    drag.active = None;

    let Some(document) = &diagram.document else {
        *bounds = DiagramBounds::default();
        return;
    };

    let root = commands
        .spawn((
            DiagramRoot,
            Name::new(format!("diagram:{}", diagram.model_name)),
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    let mut aabb = Aabb::EMPTY;
    for class in document.classes() {
        let graphic = hbds_core::build_with(class, &layout.0);
        aabb = aabb.union(&graphic.container_bounds());
        spawn_card(&mut commands, root, &graphic, &mut meshes, &mut materials);
    }

    // Centre the container's bounds on the origin
    let offset = recenter_offset(&aabb);
    commands.entity(root).insert(Transform::from_translation(offset));
    *bounds = DiagramBounds {
        aabb,
        sphere: aabb.translated(offset).bounding_sphere(),
    };

    tracing::info!(
        model = %diagram.model_name,
        classes = document.classes().len(),
        radius = bounds.sphere.radius,
        "Built diagram"
    );
}

/// Despawn a card's labels and release its assets; the card entity itself
/// goes with its root
fn release_card(
    commands: &mut Commands,
    card: &ClassCard,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    for label in &card.labels {
        commands.entity(*label).despawn();
    }
    for mesh in &card.meshes {
        meshes.remove(mesh);
    }
    for material in &card.materials {
        materials.remove(material);
    }
}

fn spawn_card(
    commands: &mut Commands,
    root: Entity,
    graphic: &ClassGraphic,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let card = commands
        .spawn((
            Name::new(graphic.name.clone()),
            Transform::from_translation(graphic.position),
            Visibility::default(),
            ChildOf(root),
        ))
        .id();

    let mut owned_meshes = Vec::new();
    let mut owned_materials = Vec::new();
    let mut parts = Vec::with_capacity(graphic.part_count());
    let mut labels = Vec::with_capacity(graphic.label_count());

    let mut add_mesh = |mesh: Mesh| {
        let handle = meshes.add(mesh);
        owned_meshes.push(handle.clone());
        handle
    };
    let mut add_material = |material: StandardMaterial| {
        let handle = materials.add(material);
        owned_materials.push(handle.clone());
        handle
    };

    // Body
    let body_mesh = add_mesh(body_mesh(&graphic.body));
    let body_material = add_material(StandardMaterial {
        base_color: to_color(graphic.body.color),
        metallic: 0.5,
        perceptual_roughness: 0.25,
        ..default()
    });
    let handle = commands
        .spawn((
            Mesh3d(body_mesh),
            MeshMaterial3d(body_material),
            Transform::IDENTITY,
            pickable(PartKind::Body.pickability()),
            CardPart(PartKind::Body),
            CardHandle { card },
            ChildOf(card),
        ))
        .id();
    parts.push(handle);

    // Border
    let mut loop_points = graphic.border.points.clone();
    if let Some(first) = loop_points.first().copied() {
        loop_points.push(first);
    }
    let border_mesh = add_mesh(line_mesh(PrimitiveTopology::LineStrip, &loop_points));
    let border_material = add_material(unlit(graphic.border.color));
    parts.push(spawn_part(commands, card, PartKind::Border, border_mesh, border_material, Vec3::ZERO));

    // Title
    let title = spawn_label(commands, card, &graphic.title, PartKind::Title);
    parts.push(title);
    labels.push(title);

    // Hub
    let hub_mesh = add_mesh(
        Circle::new(graphic.hub.radius)
            .mesh()
            .resolution(graphic.hub.segments)
            .build(),
    );
    let hub_material = add_material(unlit(graphic.hub.color));
    parts.push(spawn_part(commands, card, PartKind::Hub, hub_mesh, hub_material, graphic.hub.position));

    // Attribute rows share one marker mesh and one material per style slot
    if let Some(first_row) = graphic.rows.first() {
        let size = first_row.marker.size;
        let marker_mesh = add_mesh(Cuboid::new(size.x, size.y, size.z).mesh().build());
        let marker_material = add_material(StandardMaterial {
            base_color: to_color(first_row.marker.color),
            metallic: 1.0,
            perceptual_roughness: 0.25,
            ..default()
        });
        let connector_material = add_material(unlit(first_row.connector.color));

        for row in &graphic.rows {
            parts.push(spawn_part(
                commands,
                card,
                PartKind::Marker,
                marker_mesh.clone(),
                marker_material.clone(),
                row.marker.position,
            ));

            let connector_mesh = add_mesh(line_mesh(
                PrimitiveTopology::LineList,
                &[row.connector.from, row.connector.to],
            ));
            parts.push(spawn_part(
                commands,
                card,
                PartKind::Connector,
                connector_mesh,
                connector_material.clone(),
                Vec3::ZERO,
            ));

            let label = spawn_label(commands, card, &row.label, PartKind::AttributeLabel);
            parts.push(label);
            labels.push(label);
        }
    }

    commands.entity(card).insert(ClassCard {
        class_id: graphic.class_id.clone(),
        name: graphic.name.clone(),
        handle,
        parts,
        labels,
        meshes: owned_meshes,
        materials: owned_materials,
        local_bounds: graphic.local_bounds(),
    });

    card
}

fn spawn_part(
    commands: &mut Commands,
    card: Entity,
    kind: PartKind,
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
    translation: Vec3,
) -> Entity {
    commands
        .spawn((
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_translation(translation),
            pickable(kind.pickability()),
            CardPart(kind),
            ChildOf(card),
        ))
        .id()
}

/// Overlay labels start hidden and are placed by the label system
fn spawn_label(commands: &mut Commands, card: Entity, label: &Label, kind: PartKind) -> Entity {
    commands
        .spawn((
            Text::new(label.text.clone()),
            TextFont {
                font_size: label.font_size,
                ..default()
            },
            TextColor(to_color(label.color)),
            Node {
                position_type: PositionType::Absolute,
                ..default()
            },
            Visibility::Hidden,
            pickable(kind.pickability()),
            CardPart(kind),
            OverlayLabel {
                card,
                offset: label.position,
                anchor: label.anchor,
            },
        ))
        .id()
}

fn unlit(color: hbds_core::Rgb) -> StandardMaterial {
    StandardMaterial {
        base_color: to_color(color),
        unlit: true,
        ..default()
    }
}

fn body_mesh(body: &Body) -> Mesh {
    let geometry = extrude(&body.outline, body.depth);
    Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, geometry.positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, geometry.normals)
        .with_inserted_indices(Indices::U32(geometry.indices))
}

fn line_mesh(topology: PrimitiveTopology, points: &[Vec3]) -> Mesh {
    let positions: Vec<[f32; 3]> = points.iter().map(|p| p.to_array()).collect();
    Mesh::new(topology, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}
