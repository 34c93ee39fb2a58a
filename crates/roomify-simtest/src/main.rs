//! Roomify Headless Layout Harness
//!
//! Builds scenes from the sample data and from seeded random descriptions,
//! then checks layout, placement, drag, wall and camera invariants.
//! Runs entirely in-process: no renderer, no networking.
//!
//! Usage:
//!   cargo run -p roomify-simtest
//!   cargo run -p roomify-simtest -- --verbose

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roomify_logic::camera::ViewPreset;
use roomify_logic::config::{validate_config, EngineConfig};
use roomify_logic::constants::room_types;
use roomify_logic::drag::DragMove;
use roomify_logic::description::{parse_rooms, Dimensions, FurnitureRecord, RoomRecord};
use roomify_logic::geometry::Severity;
use roomify_logic::layout::{plan_layout, RoomFootprint};
use roomify_logic::placement::ItemId;
use roomify_logic::resolver::{AssetCatalog, ModelResolver, ModelSize, ResolveError};
use roomify_logic::scene::Scene;
use roomify_logic::walls::facing_dot;
use serde::Deserialize;

// ── Sample data (same JSON the front end ships) ─────────────────────────
const SCENE_JSON: &str = include_str!("../../../data/sample_scene.json");
const CATALOG_JSON: &str = include_str!("../../../data/asset_catalog.json");

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
    size: [f32; 3],
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    models: Vec<CatalogEntry>,
}

const SEEDS: u64 = 200;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Roomify Layout Harness ===\n");

    let mut results = Vec::new();

    // 1. Config defaults
    results.extend(validate_engine_config(verbose));

    // 2. Sample data
    results.extend(validate_sample_data(verbose));

    // 3. Room packing sweep
    results.extend(validate_layout_sweep(verbose));

    // 4. Placement sweep on random scenes
    results.extend(validate_placement_sweep(verbose));

    // 5. Random drags
    results.extend(validate_drag_sweep(verbose));

    // 6. Wall culling from random cameras
    results.extend(validate_wall_culling(verbose));

    // 7. Camera presets
    results.extend(validate_camera_presets(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Random scene generation ─────────────────────────────────────────────

const RANDOM_TYPES: [(&str, f32, f32, f32); 6] = [
    ("chair", 45.0, 45.0, 90.0),
    ("table", 120.0, 80.0, 75.0),
    ("couch", 180.0, 80.0, 75.0),
    ("bed", 160.0, 200.0, 50.0),
    ("plant", 30.0, 30.0, 60.0),
    ("shelf", 90.0, 35.0, 180.0),
];

fn random_resolver(item_type: &str) -> Result<ModelSize, ResolveError> {
    RANDOM_TYPES
        .iter()
        .find(|(name, ..)| *name == item_type)
        .map(|&(_, w, d, h)| ModelSize::new(w, d, h))
        .ok_or_else(|| ResolveError::NotFound(item_type.to_string()))
}

const RANDOM_ROOM_TYPES: [&str; 4] = [
    room_types::LIVING_ROOM,
    room_types::KITCHEN,
    room_types::BEDROOM,
    room_types::BATHROOM,
];

fn random_rooms(rng: &mut StdRng) -> Vec<RoomRecord> {
    let room_count = rng.gen_range(1..=5);
    (0..room_count)
        .map(|i| {
            let breadth = rng.gen_range(150.0..600.0_f32).round();
            let length = rng.gen_range(150.0..600.0_f32).round();
            let item_count = rng.gen_range(0..=10);
            let furniture = (0..item_count)
                .map(|_| {
                    let (name, ..) = RANDOM_TYPES[rng.gen_range(0..RANDOM_TYPES.len())];
                    FurnitureRecord {
                        item_type: name.to_string(),
                        position: [
                            rng.gen_range(-breadth..breadth),
                            rng.gen_range(-length..length),
                        ],
                        rotation: if rng.gen_bool(0.3) {
                            std::f32::consts::FRAC_PI_2
                        } else {
                            0.0
                        },
                    }
                })
                .collect();
            RoomRecord {
                room_no: i + 1,
                room_type: RANDOM_ROOM_TYPES[rng.gen_range(0..RANDOM_ROOM_TYPES.len())].into(),
                dimensions: Dimensions { breadth, length },
                room_color: "#FFFFFF".into(),
                furniture,
                furniture_count: Some(item_count),
                wall_thickness: None,
            }
        })
        .collect()
}

fn random_scene(seed: u64) -> Option<Scene> {
    let mut rng = StdRng::seed_from_u64(seed);
    let rooms = random_rooms(&mut rng);
    Scene::build(&rooms, &random_resolver, EngineConfig::default()).ok()
}

/// Errors remaining after excusing degraded and oversized items.
fn hard_errors(scene: &Scene) -> Vec<String> {
    scene
        .validate()
        .into_iter()
        .filter(|e| e.severity == Severity::Error)
        .map(|e| format!("[{}] {}", e.category, e.message))
        .collect()
}

// ── 1. Config ───────────────────────────────────────────────────────────

fn validate_engine_config(verbose: bool) -> Vec<TestResult> {
    println!("--- Engine Config ---");
    let mut results = Vec::new();

    let errors = validate_config(&EngineConfig::default());
    results.push(TestResult {
        name: "default_config_valid".into(),
        passed: errors.is_empty(),
        detail: format!("{} errors", errors.len()),
    });

    let partial = EngineConfig::from_json(r#"{ "wall_margin": 20.0 }"#);
    let passed = matches!(&partial, Ok(c) if c.wall_margin == 20.0 && c.wall_height == EngineConfig::default().wall_height);
    results.push(TestResult {
        name: "partial_config_fills_defaults".into(),
        passed,
        detail: format!("{:?}", partial.map(|c| c.wall_margin)),
    });

    let bad = EngineConfig {
        wall_margin: -1.0,
        ..EngineConfig::default()
    };
    let errors = validate_config(&bad);
    results.push(TestResult {
        name: "negative_margin_rejected".into(),
        passed: !errors.is_empty(),
        detail: format!("{} errors", errors.len()),
    });

    if verbose {
        println!("  {:?}", EngineConfig::default());
    }
    results
}

// ── 2. Sample data ──────────────────────────────────────────────────────

fn validate_sample_data(verbose: bool) -> Vec<TestResult> {
    println!("--- Sample Data ---");
    let mut results = Vec::new();

    let entries: CatalogFile = match serde_json::from_str(CATALOG_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "catalog_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    let bad_sizes: Vec<&str> = entries
        .models
        .iter()
        .filter(|m| m.size.iter().any(|v| !(v.is_finite() && *v > 0.0)))
        .map(|m| m.name.as_str())
        .collect();
    results.push(TestResult {
        name: "catalog_sizes_positive".into(),
        passed: bad_sizes.is_empty(),
        detail: if bad_sizes.is_empty() {
            format!("{} models", entries.models.len())
        } else {
            format!("bad: {:?}", bad_sizes)
        },
    });

    let catalog = match AssetCatalog::from_json(CATALOG_JSON) {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "catalog_load".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };
    results.push(TestResult {
        name: "catalog_has_default".into(),
        passed: catalog.resolve("definitely_not_a_model").is_ok(),
        detail: "unknown types fall back to the default model".into(),
    });

    let rooms = match parse_rooms(SCENE_JSON) {
        Ok(r) => r,
        Err(e) => {
            results.push(TestResult {
                name: "scene_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };
    results.push(TestResult {
        name: "scene_counts_match".into(),
        passed: rooms
            .iter()
            .all(|r| r.furniture_count.map_or(true, |c| c as usize == r.furniture.len())),
        detail: format!("{} rooms", rooms.len()),
    });

    match Scene::build(&rooms, &catalog, EngineConfig::default()) {
        Ok(scene) => {
            let errors = hard_errors(&scene);
            if verbose {
                println!("  report: {:?}", scene.report());
            }
            results.push(TestResult {
                name: "sample_scene_valid".into(),
                passed: errors.is_empty(),
                detail: if errors.is_empty() {
                    format!(
                        "{} items, {} walls",
                        scene.report().placed(),
                        scene.walls().len()
                    )
                } else {
                    errors.join("; ")
                },
            });
        }
        Err(e) => results.push(TestResult {
            name: "sample_scene_valid".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results
}

// ── 3. Layout ───────────────────────────────────────────────────────────

fn validate_layout_sweep(verbose: bool) -> Vec<TestResult> {
    println!("--- Room Packing ---");
    let mut failures = Vec::new();

    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let footprints: Vec<RoomFootprint> = (0..rng.gen_range(1..8))
            .map(|_| RoomFootprint {
                breadth: rng.gen_range(50.0..800.0),
                length: rng.gen_range(50.0..800.0),
            })
            .collect();
        let layout = plan_layout(&footprints);

        let mut edge = 0.0_f32;
        for room in &layout.rooms {
            if (room.min_x() - edge).abs() > 0.01 || room.min_z().abs() > 0.01 {
                failures.push(format!("seed {}: gap or misalignment at x={}", seed, edge));
            }
            edge = room.max_x();
        }
        if (layout.total_width - edge).abs() > 0.01 {
            failures.push(format!("seed {}: width {} != {}", seed, layout.total_width, edge));
        }
    }

    if verbose {
        println!("  {} layouts checked", SEEDS);
    }
    vec![TestResult {
        name: "rooms_contiguous_along_x".into(),
        passed: failures.is_empty(),
        detail: summarize(&failures, SEEDS),
    }]
}

// ── 4. Placement ────────────────────────────────────────────────────────

fn validate_placement_sweep(verbose: bool) -> Vec<TestResult> {
    println!("--- Placement ---");
    let mut results = Vec::new();
    let mut failures = Vec::new();
    let mut degraded = 0;
    let mut spiral = 0;

    for seed in 0..SEEDS {
        let Some(scene) = random_scene(seed) else {
            failures.push(format!("seed {}: build failed", seed));
            continue;
        };
        degraded += scene.report().degraded.len();
        spiral += scene.report().spiral;
        for e in hard_errors(&scene) {
            failures.push(format!("seed {}: {}", seed, e));
        }
        for item in scene.items() {
            let (Some(p), Some(b)) = (item.placed(), scene.item_bounds(item.id)) else {
                continue;
            };
            if (b.min.y - scene.config().floor_top_y).abs() > 0.001 {
                failures.push(format!("seed {}: {:?} not on floor", seed, item.id));
            }
            if p.y != scene.config().floor_top_y - p.size.min_y {
                failures.push(format!("seed {}: {:?} wrong origin y", seed, item.id));
            }
            if (b.size().y - p.size.height).abs() > 0.001 {
                failures.push(format!("seed {}: {:?} box height mismatch", seed, item.id));
            }
        }
    }

    if verbose {
        println!("  {} spiral moves, {} degraded", spiral, degraded);
    }
    results.push(TestResult {
        name: "placements_valid".into(),
        passed: failures.is_empty(),
        detail: summarize(&failures, SEEDS),
    });

    let deterministic = (0..20).all(|seed| {
        match (random_scene(seed), random_scene(seed)) {
            (Some(a), Some(b)) => a.items() == b.items(),
            _ => false,
        }
    });
    results.push(TestResult {
        name: "placement_deterministic".into(),
        passed: deterministic,
        detail: "same description, same positions".into(),
    });

    results
}

// ── 5. Drag ─────────────────────────────────────────────────────────────

fn validate_drag_sweep(verbose: bool) -> Vec<TestResult> {
    println!("--- Drag ---");
    let mut failures = Vec::new();
    let mut moves = 0;
    let mut reverts = 0;

    for seed in 0..SEEDS {
        let Some(mut scene) = random_scene(seed) else {
            continue;
        };
        let ids: Vec<ItemId> = scene
            .items()
            .iter()
            .filter(|i| i.placed().is_some_and(|p| !p.outcome.is_degraded() && !p.oversized()))
            .map(|i| i.id)
            .collect();
        if ids.is_empty() {
            continue;
        }
        let Some(bounds) = scene.bounds().copied() else {
            continue;
        };

        let mut rng = StdRng::seed_from_u64(seed ^ 0xD4A6);
        for _ in 0..10 {
            let id = ids[rng.gen_range(0..ids.len())];
            if !scene.begin_drag(Some(id)) {
                failures.push(format!("seed {}: could not drag {:?}", seed, id));
                continue;
            }
            for _ in 0..5 {
                let x = rng.gen_range(bounds.min_x..bounds.max_x);
                let z = rng.gen_range(bounds.min_z..bounds.max_z);
                match scene.drag_to(x, z) {
                    Some(DragMove::Reverted { .. }) => reverts += 1,
                    Some(_) => moves += 1,
                    None => failures.push(format!("seed {}: drag session lost", seed)),
                }
            }
            scene.end_drag();
        }

        let room_sizes: usize = (0..scene.rooms().len())
            .filter_map(|r| scene.placed_set(r).map(|s| s.len()))
            .sum();
        if room_sizes != scene.report().placed() {
            failures.push(format!(
                "seed {}: {} boxes committed, {} items placed",
                seed,
                room_sizes,
                scene.report().placed()
            ));
        }
        for r in 0..scene.rooms().len() {
            let Some(set) = scene.placed_set(r) else {
                continue;
            };
            for (id, b) in set.iter() {
                if !(b.min.is_finite() && b.max.is_finite()) {
                    failures.push(format!("seed {}: {:?} non-finite box", seed, id));
                } else if scene.item_bounds(*id) != Some(*b) {
                    failures.push(format!("seed {}: {:?} committed box drifted", seed, id));
                }
            }
        }
        for e in hard_errors(&scene) {
            failures.push(format!("seed {}: after drag: {}", seed, e));
        }
    }

    if verbose {
        println!("  {} moves, {} reverts", moves, reverts);
    }
    vec![TestResult {
        name: "drag_keeps_layout_valid".into(),
        passed: failures.is_empty(),
        detail: summarize(&failures, SEEDS),
    }]
}

// ── 6. Walls ────────────────────────────────────────────────────────────

fn validate_wall_culling(verbose: bool) -> Vec<TestResult> {
    println!("--- Wall Culling ---");
    let mut results = Vec::new();
    let mut failures = Vec::new();
    let mut hidden_total = 0;

    for seed in 0..SEEDS {
        let Some(mut scene) = random_scene(seed) else {
            continue;
        };
        let mut rng = StdRng::seed_from_u64(seed ^ 0xCA11);
        let threshold = scene.config().wall_hide_threshold;
        let camera = Vec3::new(
            rng.gen_range(-2000.0..4000.0),
            rng.gen_range(10.0..2000.0),
            rng.gen_range(-2000.0..2000.0),
        );
        for wall in scene.update_wall_visibility(camera) {
            let expected = facing_dot(camera, wall) >= threshold;
            if wall.visible != expected {
                failures.push(format!("seed {}: wall {:?} of room {}", seed, wall.side, wall.room));
            }
            if !wall.visible {
                hidden_total += 1;
            }
        }
    }

    if verbose {
        println!("  {} walls hidden across {} cameras", hidden_total, SEEDS);
    }
    results.push(TestResult {
        name: "culling_matches_facing_rule".into(),
        passed: failures.is_empty(),
        detail: summarize(&failures, SEEDS),
    });

    let overhead_clear = (0..20).all(|seed| {
        let Some(mut scene) = random_scene(seed) else {
            return false;
        };
        let Some(bounds) = scene.bounds().copied() else {
            return false;
        };
        let camera = bounds.center() + Vec3::Y * bounds.scale() * 100.0;
        scene
            .update_wall_visibility(camera)
            .iter()
            .all(|w| w.visible)
    });
    results.push(TestResult {
        name: "overhead_camera_hides_no_walls".into(),
        passed: overhead_clear,
        detail: "camera far above the scene centre".into(),
    });

    results
}

// ── 7. Camera ───────────────────────────────────────────────────────────

fn validate_camera_presets(verbose: bool) -> Vec<TestResult> {
    println!("--- Camera ---");
    let mut failures = Vec::new();

    for seed in 0..SEEDS {
        let Some(mut scene) = random_scene(seed) else {
            continue;
        };
        let Some(bounds) = scene.bounds().copied() else {
            continue;
        };
        for preset in ViewPreset::ALL {
            scene.set_view(preset);
            let Some(f) = scene.framing() else {
                failures.push(format!("seed {}: no framing", seed));
                continue;
            };
            let center = bounds.center();
            if (f.pose.target - center).length() > 0.01 {
                failures.push(format!("seed {}: {} target off centre", seed, preset));
            }
            if f.orbit.max_distance < f.orbit.min_distance {
                failures.push(format!("seed {}: {} orbit limits inverted", seed, preset));
            }
            let d = f.pose.distance();
            if d < f.orbit.min_distance || d > f.orbit.max_distance {
                failures.push(format!("seed {}: {} starts outside orbit limits", seed, preset));
            }
            if f.grid_size < bounds.scale() * 2.0 - 0.01 {
                failures.push(format!("seed {}: grid smaller than scene", seed));
            }
            if f.pose.position.y <= 0.0 {
                failures.push(format!("seed {}: {} camera below floor", seed, preset));
            }
        }
        if verbose && seed == 0 {
            scene.reset_view();
            println!("  seed 0 framing: {:?}", scene.framing());
        }
    }

    vec![TestResult {
        name: "presets_frame_scene".into(),
        passed: failures.is_empty(),
        detail: summarize(&failures, SEEDS),
    }]
}

fn summarize(failures: &[String], runs: u64) -> String {
    if failures.is_empty() {
        format!("{} runs clean", runs)
    } else {
        format!(
            "{} failures, first: {}",
            failures.len(),
            failures.first().map(String::as_str).unwrap_or("")
        )
    }
}
