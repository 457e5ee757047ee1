use cgmath::{Point2, Rad};
use image::Rgb;
use voxel_space::{
    CameraPose, PaintedSpan, QualityLevel, QualityParameters, Scene, Settings, TerrainField,
    VoxelRenderer,
};

const SKY: Rgb<u8> = Rgb([0, 0, 0]);
const GRASS: Rgb<u8> = Rgb([50, 150, 50]);

fn parameters(max_view_distance: f32, switch: f32, far_stride: usize) -> QualityParameters {
    QualityParameters {
        depth_growth_rate: 0.01,
        max_view_distance,
        column_stride_switch_distance: switch,
        far_column_stride: far_stride,
    }
}

fn flat_terrain(size: u32, height: f32) -> TerrainField {
    TerrainField::from_fn(size, size, |_, _| (height, GRASS))
}

fn random_terrain(size: u32, seed: u64) -> TerrainField {
    let mut rng = fastrand::Rng::with_seed(seed);
    TerrainField::from_fn(size, size, |_, _| {
        let height = rng.u8(..) as f32;
        (height, Rgb([rng.u8(..), rng.u8(..), rng.u8(..)]))
    })
}

fn first_painted_row(frame: &voxel_space::Framebuffer, column: u32) -> Option<u32> {
    (0..frame.height()).find(|&row| frame.pixel(column, row) != SKY)
}

#[test]
fn flat_terrain_below_camera_yields_a_level_horizon() {
    let terrain = flat_terrain(512, 0.0);
    let mut renderer = VoxelRenderer::new(160, 600, SKY);
    let pose = CameraPose::new(Point2::new(256.0, 400.0), Rad(0.0), 100.0, 100.0, 120.0);

    let frame = renderer
        .render(&pose, parameters(200.0, 1000.0, 1), &terrain)
        .clone();

    // Every ring projects to the same row in every column, so all column
    // horizons end on the same value, close to 100 + 12000/200 but never at 100.
    let horizons = renderer.occlusion().as_slice();
    assert!(horizons.iter().all(|&h| h == horizons[0]));
    assert!(horizons[0] > 160.0 && horizons[0] < 165.0);

    let top = first_painted_row(&frame, 0);
    assert!(top.is_some());
    for column in 0..160 {
        assert_eq!(first_painted_row(&frame, column), top);
        assert_eq!(frame.pixel(column, 599), GRASS);
    }
}

#[test]
fn terrain_at_camera_height_sits_on_the_horizon() {
    let terrain = flat_terrain(256, 100.0);
    let mut renderer = VoxelRenderer::new(64, 200, SKY);
    let pose = CameraPose::new(Point2::new(128.0, 200.0), Rad(0.0), 100.0, 100.0, 120.0);

    let frame = renderer
        .render(&pose, parameters(100.0, 1000.0, 1), &terrain)
        .clone();

    assert!(renderer.occlusion().as_slice().iter().all(|&h| h == 100.0));
    for column in 0..64 {
        assert_eq!(frame.pixel(column, 99), SKY);
        assert_eq!(frame.pixel(column, 100), GRASS);
    }
}

#[test]
fn looking_off_the_map_paints_only_background() {
    let terrain = flat_terrain(64, 10.0);
    let mut renderer = VoxelRenderer::new(80, 60, SKY);
    // Yaw 0 opens the view toward decreasing y; everything ahead is off the map.
    let pose = CameraPose::new(Point2::new(32.0, -5.0), Rad(0.0), 50.0, 30.0, 120.0);

    let mut spans = 0;
    renderer.render_traced(&pose, parameters(300.0, 100.0, 2), &terrain, |_| spans += 1);

    assert_eq!(spans, 0);
    assert_eq!(*renderer.framebuffer(), voxel_space::Framebuffer::new(80, 60, SKY));
    assert!(renderer.occlusion().as_slice().iter().all(|&h| h == 60.0));
}

#[test]
fn view_distance_below_first_ring_renders_nothing() {
    let terrain = flat_terrain(64, 0.0);
    let mut renderer = VoxelRenderer::new(32, 32, SKY);
    let pose = CameraPose::new(Point2::new(32.0, 32.0), Rad(0.0), 10.0, 16.0, 120.0);

    let frame = renderer.render(&pose, parameters(0.5, 100.0, 1), &terrain);
    assert_eq!(*frame, voxel_space::Framebuffer::new(32, 32, SKY));
}

#[test]
fn identical_inputs_give_identical_frames() {
    let terrain = random_terrain(128, 11);
    let pose = CameraPose::new(Point2::new(64.0, 100.0), Rad(0.4), 180.0, 40.0, 120.0);
    let quality = parameters(120.0, 60.0, 3);

    let mut first = VoxelRenderer::new(96, 72, SKY);
    let mut second = VoxelRenderer::new(96, 72, SKY);

    let a = first.render(&pose, quality, &terrain).clone();
    let b = second.render(&pose, quality, &terrain).clone();
    let c = first.render(&pose, quality, &terrain).clone();

    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn spans_only_ever_tighten_each_column() {
    for seed in [1, 2, 3] {
        let terrain = random_terrain(96, seed);
        let mut renderer = VoxelRenderer::new(64, 48, SKY);
        let pose = CameraPose::new(Point2::new(48.0, 80.0), Rad(0.25), 200.0, 20.0, 60.0);

        let mut spans: Vec<PaintedSpan> = Vec::new();
        renderer.render_traced(&pose, parameters(90.0, 30.0, 2), &terrain, |span| {
            spans.push(*span)
        });
        assert!(!spans.is_empty());

        let mut horizon = vec![48.0_f32; 64];
        let mut depth = vec![0.0_f32; 64];
        for span in &spans {
            let column = span.column;
            assert_eq!(span.bottom, horizon[column]);
            assert!(span.top < span.bottom);
            assert!(span.depth >= depth[column]);
            horizon[column] = span.top;
            depth[column] = span.depth;
        }

        assert_eq!(renderer.occlusion().as_slice(), horizon.as_slice());
    }
}

#[test]
fn strided_rings_paint_whole_column_blocks() {
    let terrain = random_terrain(128, 5);
    let mut renderer = VoxelRenderer::new(64, 80, SKY);
    let pose = CameraPose::new(Point2::new(64.0, 110.0), Rad(0.0), 220.0, 30.0, 90.0);

    // Every ring is strided, so columns inside one block share every sample.
    let frame = renderer
        .render(&pose, parameters(100.0, 0.0, 4), &terrain)
        .clone();

    for block in (0..64).step_by(4) {
        for column in block + 1..block + 4 {
            for row in 0..80 {
                assert_eq!(frame.pixel(column, row), frame.pixel(block, row));
            }
        }
    }
}

#[test]
fn near_rings_stay_full_resolution() {
    let terrain = TerrainField::from_fn(128, 128, |x, _| (0.0, Rgb([x as u8, 0, 200])));
    let mut renderer = VoxelRenderer::new(64, 80, SKY);
    let pose = CameraPose::new(Point2::new(64.0, 110.0), Rad(0.0), 0.0, 40.0, 120.0);

    // With camera and terrain at equal heights only the first ring is visible.
    let mut spans = Vec::new();
    renderer.render_traced(&pose, parameters(100.0, 50.0, 8), &terrain, |span| {
        spans.push(*span)
    });

    assert_eq!(spans.len(), 64);
    assert!(spans.iter().all(|span| span.depth == 1.0));
    let columns: Vec<usize> = spans.iter().map(|span| span.column).collect();
    assert_eq!(columns, (0..64).collect::<Vec<_>>());
}

#[test]
fn quality_toggle_applies_to_whole_frames() {
    let settings = Settings {
        screen_width: 80,
        screen_height: 60,
        initial_position: [64.0, 120.0],
        initial_height: 200.0,
        horizon: 20.0,
        ..Settings::default()
    };
    let mut scene = Scene::new(&settings, random_terrain(128, 9));
    let policy = scene.quality().clone();
    let pose = *scene.camera();

    let high = scene.advance_frame().clone();
    assert_eq!(scene.toggle_quality(), QualityLevel::Low);
    let low = scene.advance_frame().clone();

    let mut reference = VoxelRenderer::new(80, 60, settings.background());
    let expected_high = reference
        .render(&pose, policy.parameters_for(QualityLevel::High), scene.terrain())
        .clone();
    let expected_low = reference
        .render(&pose, policy.parameters_for(QualityLevel::Low), scene.terrain())
        .clone();

    assert_eq!(high, expected_high);
    assert_eq!(low, expected_low);
}
