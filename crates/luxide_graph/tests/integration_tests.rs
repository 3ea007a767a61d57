//! Integration tests for luxide_graph

use luxide_graph::*;
use luxide_schema::*;
use proptest::prelude::*;

const SCENARIO: &str = r#"{
    "name": "Scenario",
    "parameters": {
        "image_dimensions": [200, 100], "tile_dimensions": [20, 10],
        "gamma_correction": 2.2, "samples_per_checkpoint": 8,
        "total_checkpoints": 4, "max_bounces": 16, "use_scaling_truncation": true
    },
    "active_scene": {
        "geometrics": [{
            "type": "box", "a": [0, 0, 0], "b": [1, 1, 1],
            "material": {
                "type": "lambertian",
                "reflectance_texture": {"type": "solid_color", "color": [0.73, 0.73, 0.73]},
                "emittance_texture": "Black"
            }
        }],
        "use_bvh": true,
        "camera": "Camera 1",
        "background_color": [0, 0, 0]
    },
    "cameras": {
        "Camera 1": {
            "vertical_field_of_view_degrees": 40, "eye_location": [0, 0, -10],
            "target_location": [0, 0, 0], "view_up": [0, 1, 0],
            "defocus_angle_degrees": 0, "focus_distance": 10
        }
    },
    "textures": {"Black": {"type": "color", "color": [0, 0, 0]}}
}"#;

#[test]
fn test_inline_scene_is_linearized() {
    let mut config = RenderConfig::from_json(SCENARIO).unwrap();
    normalize(&mut config);

    assert_eq!(config.active_scene.name(), Some("Scene 1"));
    let scene = &config.scenes["Scene 1"];
    let geometrics: Vec<_> = scene.geometrics.iter().map(|g| g.name()).collect();
    assert_eq!(geometrics, vec![Some("Box 1")]);
    assert_eq!(scene.camera.name(), Some("Camera 1"));

    let material_name = config.geometrics["Box 1"].material().and_then(|m| m.name());
    assert_eq!(material_name, Some("Lambertian 1"));

    let material = &config.materials["Lambertian 1"];
    assert_eq!(material.emittance_texture().name(), Some("Black"));
    let reflectance = material.reflectance_texture().name().unwrap();
    assert_ne!(reflectance, "Black");
    assert_eq!(config.textures[reflectance], TextureData::color([0.73, 0.73, 0.73]));

    assert!(is_normalized(&config));
}

#[test]
fn test_normalized_document_encodes_references_as_strings() {
    let (config, _) = normalized(&RenderConfig::from_json(SCENARIO).unwrap());
    let value = config.to_value().unwrap();

    assert_eq!(value.get("active_scene"), Some(&Value::from("Scene 1")));
    let material = value
        .get("geometrics")
        .and_then(|g| g.get("Box 1"))
        .and_then(|b| b.get("material"));
    assert_eq!(material, Some(&Value::from("Lambertian 1")));
}

#[test]
fn test_resolution_after_normalization() {
    let (config, _) = normalized(&RenderConfig::from_json(SCENARIO).unwrap());
    let box_field: GeometricRef = "Box 1".into();
    let resolved = resolve(&config, &box_field).unwrap();
    assert_eq!(resolved.source, Source::Reference("Box 1".to_string()));

    let material = resolve(&config, resolved.value.material().unwrap()).unwrap();
    assert_eq!(material.value.tag(), "lambertian");
}

#[test]
fn test_sweep_after_removing_scene_content() {
    let (mut config, _) = normalized(&RenderConfig::from_json(SCENARIO).unwrap().with_builtins());
    config.scenes["Scene 1"].geometrics.clear();

    let removed = sweep_orphans(&mut config);
    let removed_names: Vec<&str> = removed.iter().map(|(_, n)| n.as_str()).collect();
    assert_eq!(removed_names, vec!["Black", "Color 1", "Lambertian 1", "Box 1"]);
    assert!(config.cameras.contains_key("Camera 1"));
    assert!(dangling_references(&config).is_empty());
}

#[test]
fn test_named_scene_with_inline_geometrics_keeps_its_references() {
    let mut config = RenderConfig::from_json(SCENARIO).unwrap().with_builtins();
    let scene = config.active_scene.replace_with_ref("Main").unwrap();
    config.scenes.insert("Main".to_string(), scene);

    let report = normalize(&mut config);
    assert!(report.names(EntityKind::Scene).is_empty());
    assert_eq!(config.active_scene.name(), Some("Main"));
    assert_eq!(config.scenes["Main"].camera.name(), Some("Camera 1"));
    assert_eq!(config.materials["Lambertian 1"].emittance_texture().name(), Some("Black"));
    assert!(is_normalized(&config));

    let (again, report) = normalized(&config);
    assert!(report.is_empty());
    assert_eq!(again, config);

    let removed = sweep_orphans(&mut config);
    assert!(removed.iter().all(|(_, name)| name != "Camera 1" && name != "Black"));
    assert!(config.cameras.contains_key("Camera 1"));
}

fn texture_field() -> impl Strategy<Value = TextureRef> {
    let leaf = prop_oneof![
        Just(TextureRef::from(builtin::WHITE)),
        (0.0f64..8.0).prop_map(|c| RefOrInline::inline(TextureData::color([c, c, c]))),
    ];
    leaf.prop_recursive(2, 8, 2, |inner| {
        (inner.clone(), inner).prop_map(|(even, odd)| {
            RefOrInline::inline(TextureData::Checker {
                scale: 1.0,
                even_texture: even,
                odd_texture: odd,
            })
        })
    })
}

fn material_field() -> impl Strategy<Value = MaterialRef> {
    prop_oneof![
        Just(MaterialRef::from(builtin::LAMBERTIAN_WHITE)),
        (texture_field(), texture_field())
            .prop_map(|(r, e)| RefOrInline::inline(MaterialData::lambertian(r, e))),
        (texture_field(), 0.0f64..1.0).prop_map(|(r, roughness)| {
            RefOrInline::inline(MaterialData::Specular {
                reflectance_texture: r,
                emittance_texture: builtin::BLACK.into(),
                roughness,
            })
        }),
    ]
}

fn geometric_field() -> impl Strategy<Value = GeometricRef> {
    let leaf = prop_oneof![
        Just(GeometricRef::from(builtin::UNIT_BOX)),
        material_field()
            .prop_map(|m| RefOrInline::inline(GeometricData::aabb([0.0; 3], [1.0; 3], m))),
        (material_field(), 0.1f64..5.0).prop_map(|(material, radius)| {
            RefOrInline::inline(GeometricData::Sphere {
                center: [0.0; 3],
                radius,
                material,
            })
        }),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(|geometrics| {
                RefOrInline::inline(GeometricData::List {
                    use_bvh: None,
                    geometrics,
                })
            }),
            (inner.clone(), 0.0f64..360.0).prop_map(|(geometric, degrees)| {
                RefOrInline::inline(GeometricData::RotateY(Rotation {
                    geometric,
                    degrees: Some(degrees),
                    radians: None,
                    around: None,
                }))
            }),
            (inner, texture_field()).prop_map(|(geometric, reflectance_texture)| {
                RefOrInline::inline(GeometricData::ConstantVolume {
                    geometric,
                    density: 0.5,
                    reflectance_texture,
                })
            }),
        ]
    })
}

fn inline_config() -> impl Strategy<Value = RenderConfig> {
    (
        prop::collection::vec(geometric_field(), 0..4),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(geometrics, inline_camera, named_scene)| {
            let camera = if inline_camera {
                RefOrInline::inline(CameraData::default())
            } else {
                CameraRef::from("Camera 1")
            };
            let scene = SceneData {
                geometrics,
                use_bvh: true,
                camera,
                background_color: [0.0; 3],
            };
            let mut config = Template::Empty.build();
            if named_scene {
                config.scenes.insert("Scene 1".to_string(), scene);
                config.active_scene = "Scene 1".into();
            } else {
                config.active_scene = RefOrInline::inline(scene);
            }
            config
        })
}

proptest! {
    #[test]
    fn test_normalize_produces_well_formed_documents(config in inline_config()) {
        let before = config.entity_count();
        let (normalized, report) = normalized(&config);

        prop_assert!(is_normalized(&normalized));
        prop_assert!(dangling_references(&normalized).is_empty());
        prop_assert_eq!(normalized.entity_count(), before + report.len());
    }

    #[test]
    fn test_normalize_is_idempotent(config in inline_config()) {
        let (once, _) = normalized(&config);
        let (twice, report) = normalized(&once);
        prop_assert!(report.is_empty());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_allocated_names_are_fresh(taken in prop::collection::btree_set(1usize..12, 0..10)) {
        let table: indexmap::IndexMap<String, ()> =
            taken.iter().map(|n| (format!("Box {}", n), ())).collect();
        let name = next_unique_name(&table, "Box");
        prop_assert!(!table.contains_key(&name));

        let smallest_free = (1usize..).find(|n| !taken.contains(n)).unwrap();
        prop_assert_eq!(name, format!("Box {}", smallest_free));
    }
}
