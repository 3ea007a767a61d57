//! Integration tests for luxide_schema

use luxide_schema::*;

const EVERY_GEOMETRIC: &str = r#"{
    "name": "Shapes",
    "parameters": {
        "image_dimensions": [320, 240], "tile_dimensions": [32, 24],
        "gamma_correction": 2.2, "samples_per_checkpoint": 4,
        "total_checkpoints": 2, "max_bounces": 8, "use_scaling_truncation": false
    },
    "active_scene": "Main",
    "scenes": {
        "Main": {
            "geometrics": ["Everything"],
            "use_bvh": false,
            "camera": {
                "vertical_field_of_view_degrees": 60, "eye_location": [0, 1, 5],
                "target_location": [0, 1, 0], "view_up": [0, 1, 0],
                "defocus_angle_degrees": 0.5, "focus_distance": 5
            },
            "background_color": [0.1, 0.1, 0.2]
        }
    },
    "geometrics": {
        "Everything": {
            "type": "list",
            "geometrics": [
                "Ball",
                {"type": "rotate_x", "geometric": "Ball", "radians": 1.57},
                {"type": "translate", "geometric": "Ball", "translation": [1, 0, 0]},
                {"type": "parallelogram", "lower_left": [0, 0, 0], "u": [1, 0, 0], "v": [0, 0, 1],
                 "material": "Glass"},
                {"type": "triangle", "a": [0, 0, 0], "b": [1, 0, 0], "c": [0, 1, 0],
                 "is_culled": true, "material": "Glass"},
                {"type": "obj_model", "filename": "teapot.obj", "scale": 0.5, "material": "Glass"},
                {"type": "constant_volume", "geometric": "Ball", "density": 0.2,
                 "reflectance_texture": {"type": "image", "filename": "fog.png"}}
            ]
        },
        "Ball": {"type": "sphere", "center": [0, 1, 0], "radius": 1, "material": "Glass"}
    },
    "materials": {
        "Glass": {
            "type": "dielectric",
            "reflectance_texture": "Board",
            "emittance_texture": {"type": "solid_color", "color": [0, 0, 0]},
            "index_of_refraction": 1.5
        }
    },
    "textures": {
        "Board": {"type": "checker", "scale": 2, "even_texture": "Ivory", "odd_texture": "Ink"},
        "Ivory": {"type": "color", "color": [1, 1, 0.9]},
        "Ink": {"type": "color", "color": [0, 0, 0]}
    }
}"#;

#[test]
fn test_decode_every_entity_type() {
    let config = RenderConfig::from_json(EVERY_GEOMETRIC).unwrap();

    let list = &config.geometrics["Everything"];
    let tags: Vec<&str> = list
        .geometric_fields()
        .iter()
        .map(|field| match field {
            RefOrInline::Ref(_) => "ref",
            RefOrInline::Inline(inline) => inline.tag(),
        })
        .collect();
    assert_eq!(
        tags,
        vec![
            "ref",
            "rotate_x",
            "translate",
            "parallelogram",
            "triangle",
            "obj_model",
            "constant_volume"
        ]
    );

    let camera = config.scenes["Main"].camera.as_inline().unwrap();
    assert_eq!(camera.focus_distance, FocusDistance::Exact(5.0));

    let glass = &config.materials["Glass"];
    assert_eq!(
        glass.emittance_texture().as_inline(),
        Some(&TextureData::color([0.0, 0.0, 0.0]))
    );
    assert_eq!(config.entity_count(), 7);
}

#[test]
fn test_wire_output_omits_empty_parts() {
    let config = RenderConfig::from_json(EVERY_GEOMETRIC).unwrap();
    let value = config.to_value().unwrap();

    assert!(value.get("cameras").is_none());
    let triangle = value
        .get("geometrics")
        .and_then(|g| g.get("Everything"))
        .and_then(|e| e.get("geometrics"))
        .and_then(Value::as_array)
        .and_then(|items| items.get(4))
        .unwrap();
    assert!(triangle.get("a_normal").is_none());
    assert_eq!(triangle.get("is_culled"), Some(&Value::from(true)));

    let reencoded = RenderConfig::from_value(&value).unwrap();
    assert_eq!(reencoded, config);
}

#[test]
fn test_wrong_inline_kind_is_rejected() {
    let text = EVERY_GEOMETRIC.replace(r#""geometrics": ["Everything"]"#, r#""geometrics": [7]"#);
    let err = RenderConfig::from_json(&text).unwrap_err();
    assert!(err.to_string().contains("expected a geometric name"));

    let text = EVERY_GEOMETRIC.replace(r#""Ink": {"type": "color""#, r#""Ink": {"type": "marble""#);
    assert!(RenderConfig::from_json(&text).is_err());
}

#[test]
fn test_templates_decode_from_their_own_output() {
    for template in Template::ALL {
        let config = template.build();
        let text = config.to_json_pretty().unwrap();
        assert_eq!(RenderConfig::from_json(&text).unwrap(), config);
        assert_eq!(template.name().parse::<Template>().unwrap(), template);
    }
    assert!(matches!(
        "mandelbulb".parse::<Template>(),
        Err(SchemaError::UnknownTemplate(_))
    ));
}

#[test]
fn test_default_values_for_type_changes() {
    let sphere = default_value_for(EntityKind::Geometric, "sphere").unwrap();
    assert_eq!(sphere.get("type"), Some(&Value::from("sphere")));
    assert!(sphere.get("radius").is_some());

    assert!(matches!(
        default_value_for(EntityKind::Camera, "perspective"),
        Err(SchemaError::UnknownType { .. })
    ));
}
