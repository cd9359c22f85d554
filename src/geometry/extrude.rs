use bevy::prelude::*;
use bevy::render::{
    mesh::{Indices, PrimitiveTopology},
    render_asset::RenderAssetUsages,
};
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers,
};

use crate::types::GeometryError;

/// Extrusion depth below the ground plane.
pub const EXTRUDE_DEPTH: f32 = 1.0;

/// Closed 2D profile of one ring. The first point opens the profile,
/// interior points are straight edges, and the last point is a quadratic
/// edge whose control point equals the endpoint. The degenerate curve is
/// numerically a straight line but is part of the profile contract, so it
/// is kept rather than simplified away.
pub fn ring_profile(ring: &[Vec3]) -> Path {
    let mut builder = Path::builder();
    for (i, p) in ring.iter().enumerate() {
        let at = point(p.x, p.y);
        if i == 0 {
            builder.begin(at);
        } else if i == ring.len() - 1 {
            builder.quadratic_bezier_to(at, at);
        } else {
            builder.line_to(at);
        }
    }
    builder.end(true);
    builder.build()
}

/// Extrudes one projected ring into a solid: fill-tessellated caps at z = 0
/// and z = -EXTRUDE_DEPTH joined by flat-shaded side walls. No bevel.
pub fn build_solid(ring: &[Vec3]) -> Result<Mesh, GeometryError> {
    if ring.len() < 3 {
        return Err(GeometryError::DegenerateRing);
    }

    let path = ring_profile(ring);
    let mut cap: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();
    tessellator
        .tessellate_path(
            &path,
            &FillOptions::default(),
            &mut BuffersBuilder::new(&mut cap, |vertex: FillVertex| vertex.position().to_array()),
        )
        .map_err(|e| GeometryError::Tessellation(e.to_string()))?;

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(cap.vertices.len() * 2 + ring.len() * 4);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(positions.capacity());
    let mut indices: Vec<u32> = Vec::new();

    // Top cap on the ground plane.
    for v in &cap.vertices {
        positions.push([v[0], v[1], 0.0]);
        normals.push([0.0, 0.0, 1.0]);
    }
    indices.extend_from_slice(&cap.indices);

    // Bottom cap, wound the other way.
    let bottom = positions.len() as u32;
    for v in &cap.vertices {
        positions.push([v[0], v[1], -EXTRUDE_DEPTH]);
        normals.push([0.0, 0.0, -1.0]);
    }
    for tri in cap.indices.chunks_exact(3) {
        indices.extend_from_slice(&[bottom + tri[2], bottom + tri[1], bottom + tri[0]]);
    }

    // Side walls along the ring outline. When the ring already closes on
    // its first point the final pair covers the loop; otherwise a closing
    // segment back to the start is added.
    let closed = ring.first() == ring.last();
    let segments = if closed { ring.len() - 1 } else { ring.len() };
    for i in 0..segments {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        if a == b {
            continue;
        }
        let normal = wall_normal(a, b);
        let base = positions.len() as u32;
        positions.push([a.x, a.y, 0.0]);
        positions.push([b.x, b.y, 0.0]);
        positions.push([b.x, b.y, -EXTRUDE_DEPTH]);
        positions.push([a.x, a.y, -EXTRUDE_DEPTH]);
        normals.extend_from_slice(&[normal; 4]);
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_indices(Indices::U32(indices));
    Ok(mesh)
}

fn wall_normal(a: Vec3, b: Vec3) -> [f32; 3] {
    let edge = (b - a).truncate().normalize_or_zero();
    [edge.y, -edge.x, 0.0]
}

/// Fixed appearance shared by every extruded region solid: accent color at
/// 0.6 opacity, rendered from both sides since the orbit camera can look at
/// thin walls from either direction.
pub fn solid_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgba(0.0, 0x6d as f32 / 255.0, 0xe0 as f32 / 255.0, 0.6),
        alpha_mode: AlphaMode::Blend,
        double_sided: true,
        cull_mode: None,
        unlit: true,
        ..default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::color::Alpha;
    use bevy::render::mesh::VertexAttributeValues;
    use lyon::path::PathEvent;

    fn square_ring() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
        ]
    }

    fn mesh_positions(mesh: &Mesh) -> &Vec<[f32; 3]> {
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(positions)) => positions,
            other => panic!("unexpected position attribute {other:?}"),
        }
    }

    #[test]
    fn profile_opens_at_the_first_point_and_closes() {
        let ring = square_ring();
        let events: Vec<PathEvent> = ring_profile(&ring).iter().collect();

        match events.first() {
            Some(PathEvent::Begin { at }) => assert_eq!(*at, point(0.0, 0.0)),
            other => panic!("profile must start with a Begin event, got {other:?}"),
        }
        match events.last() {
            Some(PathEvent::End { close, .. }) => assert!(close),
            other => panic!("profile must end closed, got {other:?}"),
        }
    }

    #[test]
    fn last_edge_is_a_degenerate_quadratic() {
        let ring = square_ring();
        let last = ring.last().unwrap();
        let quadratics: Vec<_> = ring_profile(&ring)
            .iter()
            .filter_map(|event| match event {
                PathEvent::Quadratic { ctrl, to, .. } => Some((ctrl, to)),
                _ => None,
            })
            .collect();

        assert_eq!(quadratics.len(), 1);
        let (ctrl, to) = quadratics[0];
        assert_eq!(ctrl, to);
        assert_eq!(to, point(last.x, last.y));
    }

    #[test]
    fn solid_spans_the_extrusion_depth() {
        let mesh = build_solid(&square_ring()).unwrap();
        let positions = mesh_positions(&mesh);
        assert!(!positions.is_empty());
        for p in positions {
            assert!(p[2] == 0.0 || p[2] == -EXTRUDE_DEPTH);
        }
        assert!(positions.iter().any(|p| p[2] == 0.0));
        assert!(positions.iter().any(|p| p[2] == -EXTRUDE_DEPTH));
    }

    #[test]
    fn solid_walls_every_outline_segment() {
        let ring = square_ring();
        let mesh = build_solid(&ring).unwrap();
        let positions = mesh_positions(&mesh);
        // Four wall quads for a square with a coincident closing point,
        // plus two equal caps of at least a triangle each.
        let caps = positions.len() - 4 * 4;
        assert!(caps >= 6);
        assert_eq!(caps % 2, 0);

        let Some(Indices::U32(indices)) = mesh.indices() else {
            panic!("solid must carry u32 indices");
        };
        assert_eq!(indices.len() % 3, 0);
    }

    #[test]
    fn open_ring_gets_a_closing_wall() {
        // Same square without the duplicated first point: the closing
        // segment back to the start is generated, so the wall count matches
        // the closed variant.
        let open: Vec<Vec3> = square_ring().into_iter().take(4).collect();
        let closed_mesh = build_solid(&square_ring()).unwrap();
        let open_mesh = build_solid(&open).unwrap();
        assert_eq!(
            mesh_positions(&open_mesh).len(),
            mesh_positions(&closed_mesh).len()
        );
    }

    #[test]
    fn short_rings_are_rejected() {
        let ring = [Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)];
        assert!(matches!(
            build_solid(&ring),
            Err(GeometryError::DegenerateRing)
        ));
    }

    #[test]
    fn material_matches_the_fixed_appearance() {
        let material = solid_material();
        assert_eq!(material.base_color.alpha(), 0.6);
        assert_eq!(material.alpha_mode, AlphaMode::Blend);
        assert!(material.double_sided);
        assert!(material.cull_mode.is_none());
        assert!(material.unlit);
    }
}
