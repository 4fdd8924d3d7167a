//! End-to-end checks of the rectilinear kernel driven by the QR pipeline.

use approx::assert_relative_eq;
use glam::DVec3;
use proptest::prelude::*;
use qr_solid::{
    compile, compress_matrix, generate, Accumulator, Aabb, CellRef, GridLayout, ModuleMatrix,
    PlateSpec, QrOptions, Span,
};
use solid_mesh::{write_stl_binary, MeshKernel, RectSolid};

fn no_plate(size: f64) -> QrOptions {
    QrOptions {
        size,
        create_base: false,
        ..QrOptions::default()
    }
}

/// 4-connected islands of filled modules.
fn islands(matrix: &ModuleMatrix) -> usize {
    let n = matrix.size();
    let mut seen = vec![false; n * n];
    let mut count = 0;
    for start in 0..n * n {
        if seen[start] || !matrix.is_filled(start / n, start % n) {
            continue;
        }
        count += 1;
        let mut stack = vec![start];
        seen[start] = true;
        while let Some(i) = stack.pop() {
            let (r, c) = (i / n, i % n);
            let neighbours = [
                (r.wrapping_sub(1), c),
                (r + 1, c),
                (r, c.wrapping_sub(1)),
                (r, c + 1),
            ];
            for (nr, nc) in neighbours {
                if matrix.is_filled(nr, nc) && !seen[nr * n + nc] {
                    seen[nr * n + nc] = true;
                    stack.push(nr * n + nc);
                }
            }
        }
    }
    count
}

#[test]
fn test_checkerboard_corners_are_five_lumps() {
    let matrix = ModuleMatrix::parse("#.#\n.#.\n#.#").unwrap();
    let solid = generate(&MeshKernel::new(), &matrix, &no_plate(3.0))
        .unwrap()
        .into_solid();

    assert_eq!(solid.lump_count(), 5);
    assert_relative_eq!(solid.volume(), 5.0, epsilon = 1e-9);
    assert_eq!(
        solid.bounds(),
        Aabb::new(DVec3::new(-1.5, -1.5, 0.0), DVec3::new(1.5, 1.5, 1.0))
    );

    let mesh = solid.to_mesh().unwrap();
    assert_relative_eq!(mesh.signed_volume(), 5.0, epsilon = 1e-9);
}

#[test]
fn test_plate_joins_everything() {
    let matrix = ModuleMatrix::parse("#.#\n.#.\n#.#").unwrap();
    let options = QrOptions {
        size: 3.0,
        margin: 1.0,
        base_thickness: 2.0,
        ..QrOptions::default()
    };
    let solid = generate(&MeshKernel::new(), &matrix, &options)
        .unwrap()
        .into_solid();

    assert_eq!(solid.lump_count(), 1);
    // 5 unit blocks plus a 5 x 5 x 2 plate
    assert_relative_eq!(solid.volume(), 5.0 + 50.0, epsilon = 1e-9);
    assert_relative_eq!(solid.bounds().min.z, -2.0);
}

#[test]
fn test_face_connected_code_meshes_closed() {
    let matrix = ModuleMatrix::parse(
        "
        ####
        #..#
        #..#
        ####
        ",
    )
    .unwrap();
    let layout = GridLayout::centered(8.0, 4, 0.5).unwrap();
    let plate = PlateSpec::new(1.0, 1.0).unwrap();
    let solid = compile(&MeshKernel::new(), &matrix, &layout, Some(&plate))
        .unwrap()
        .into_solid();

    let mesh = solid.to_mesh().unwrap();
    assert!(mesh.is_closed());
    assert!(mesh.validate());
    let expected = 12.0 * 2.0 * 2.0 * 0.5 + 10.0 * 10.0 * 1.0;
    assert_relative_eq!(mesh.signed_volume(), expected, epsilon = 1e-9);
}

#[test]
fn test_diagonal_modules_on_plate_mesh_closed() {
    let matrix = ModuleMatrix::parse("#.\n.#").unwrap();
    let options = QrOptions {
        size: 2.0,
        margin: 1.0,
        base_thickness: 1.0,
        ..QrOptions::default()
    };
    let solid = generate(&MeshKernel::new(), &matrix, &options)
        .unwrap()
        .into_solid();
    assert_eq!(solid.lump_count(), 1);

    let mesh = solid.to_mesh().unwrap();
    assert!(mesh.is_closed());
    assert!(mesh.validate());
    // two unit blocks on a 4 x 4 x 1 plate
    assert_relative_eq!(mesh.signed_volume(), 2.0 + 16.0, epsilon = 1e-9);
}

#[test]
fn test_diagonal_modules_without_plate_keep_separate_edges() {
    let matrix = ModuleMatrix::parse("#.\n.#").unwrap();
    let solid = generate(&MeshKernel::new(), &matrix, &no_plate(2.0))
        .unwrap()
        .into_solid();
    let mesh = solid.to_mesh().unwrap();

    assert!(mesh.is_closed());
    // each block keeps its own copy of the shared vertical edge
    assert_eq!(mesh.vertex_count(), 16);
    assert_eq!(mesh.triangle_count(), 24);
    assert_relative_eq!(mesh.signed_volume(), 2.0, epsilon = 1e-9);
}

#[test]
fn test_blocks_touching_at_a_corner_mesh_closed() {
    let a = RectSolid::cuboid(Aabb::new(DVec3::ZERO, DVec3::ONE)).unwrap();
    let solid = a.union(&a.translated(DVec3::ONE)).unwrap();
    let mesh = solid.to_mesh().unwrap();

    assert!(mesh.is_closed());
    assert_eq!(mesh.vertex_count(), 16);
    assert_relative_eq!(mesh.signed_volume(), 2.0, epsilon = 1e-9);
}

#[test]
fn test_overlapping_boxes_union_exactly() {
    let kernel = MeshKernel::new();
    let a = RectSolid::cuboid(Aabb::new(DVec3::ZERO, DVec3::splat(2.0))).unwrap();
    let b = a.translated(DVec3::new(1.0, 1.0, 0.0));
    let u = qr_solid::SolidKernel::union(&kernel, a, b).unwrap();

    assert_relative_eq!(u.volume(), 8.0 + 8.0 - 2.0, epsilon = 1e-9);
    let mesh = u.to_mesh().unwrap();
    assert!(mesh.is_closed());
    assert_relative_eq!(mesh.signed_volume(), 14.0, epsilon = 1e-9);
}

#[test]
fn test_stl_triangle_count_matches_mesh() {
    let matrix = ModuleMatrix::parse("##\n#.").unwrap();
    let solid = generate(&MeshKernel::new(), &matrix, &no_plate(2.0))
        .unwrap()
        .into_solid();
    let mesh = solid.to_mesh().unwrap();

    let mut out = Vec::new();
    write_stl_binary(&mesh, "L", &mut out).unwrap();
    let count = u32::from_le_bytes([out[80], out[81], out[82], out[83]]) as usize;
    assert_eq!(count, mesh.triangle_count());
    assert_eq!(out.len(), 84 + 50 * count);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn union_volume_and_lumps_match_matrix(
        rows in (1usize..10).prop_flat_map(|n| {
            prop::collection::vec(prop::collection::vec(any::<bool>(), n), n)
        }),
        create_base in any::<bool>(),
    ) {
        let matrix = ModuleMatrix::from_rows(rows).unwrap();
        prop_assume!(create_base || !matrix.is_blank());

        let n = matrix.size() as f64;
        let options = QrOptions {
            size: n * 2.0,
            thickness: 1.0,
            create_base,
            margin: 1.0,
            base_thickness: 1.0,
        };
        let solid = generate(&MeshKernel::new(), &matrix, &options).unwrap().into_solid();

        let blocks = matrix.filled_count() as f64 * 4.0;
        let plate = if create_base { (n * 2.0 + 2.0).powi(2) } else { 0.0 };
        prop_assert!((solid.volume() - (blocks + plate)).abs() < 1e-6);

        let expected_lumps = if create_base { 1 } else { islands(&matrix) };
        prop_assert_eq!(solid.lump_count(), expected_lumps);

        let mesh = solid.to_mesh().unwrap();
        prop_assert!(mesh.is_closed());
        prop_assert!((mesh.signed_volume() - (blocks + plate)).abs() < 1e-6);
    }

    #[test]
    fn union_is_order_independent(
        (matrix, forward, shuffled) in (1usize..9)
            .prop_flat_map(|n| prop::collection::vec(prop::collection::vec(any::<bool>(), n), n))
            .prop_filter_map("blank matrix", |rows| {
                let matrix = ModuleMatrix::from_rows(rows).ok()?;
                let spans = compress_matrix(&matrix);
                (!spans.is_empty()).then_some((matrix, spans))
            })
            .prop_flat_map(|(matrix, spans)| {
                (Just(matrix), Just(spans.clone()), Just(spans).prop_shuffle())
            }),
    ) {
        let n = matrix.size();
        let layout = GridLayout::centered(n as f64, n, 1.0).unwrap();
        let kernel = MeshKernel::new();
        let a = accumulate(&kernel, &layout, &forward);
        let b = accumulate(&kernel, &layout, &shuffled);

        prop_assert!((a.volume() - b.volume()).abs() < 1e-9);
        prop_assert_eq!(a.bounds(), b.bounds());
        prop_assert_eq!(a.lump_count(), b.lump_count());
        for r in 0..n {
            for c in 0..n {
                let p = DVec3::new(
                    layout.origin.x + c as f64 + 0.5,
                    layout.origin.y - r as f64 - 0.5,
                    0.5,
                );
                prop_assert_eq!(a.contains_point(p), b.contains_point(p));
                prop_assert_eq!(a.contains_point(p), matrix.is_filled(r, c));
            }
        }
    }
}

fn accumulate(kernel: &MeshKernel, layout: &GridLayout, spans: &[Span]) -> RectSolid {
    let mut acc = Accumulator::new(kernel);
    for span in spans {
        acc.add(&layout.place(span), CellRef::new(span.row, span.start_col))
            .unwrap();
    }
    acc.into_solid().unwrap().unwrap()
}
