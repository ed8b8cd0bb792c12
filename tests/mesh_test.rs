use hidden_city::{
    error::MeshError,
    resources::{
        decode_model,
        mesh::{DecodedMesh, DecodedNode, smooth_normals},
    },
};

use crate::common::test_utils::{temp_path, write_file};

mod common;

fn triangle() -> DecodedMesh {
    DecodedMesh {
        name: "triangle".to_string(),
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        indices: vec![0, 1, 2],
        ..Default::default()
    }
}

fn named(name: &str) -> DecodedMesh {
    DecodedMesh {
        name: name.to_string(),
        ..Default::default()
    }
}

fn assert_close(actual: [f32; 3], expected: [f32; 3]) {
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-5, "{:?} != {:?}", actual, expected);
    }
}

#[test]
fn should_default_missing_tex_coords_to_origin() {
    let vertices = triangle().build_vertices().expect("valid mesh");
    assert_eq!(vertices.len(), 3);
    assert!(vertices.iter().all(|v| v.tex_coords == [0.0, 0.0]));
}

#[test]
fn should_generate_normals_when_missing() {
    let vertices = triangle().build_vertices().expect("valid mesh");
    for v in &vertices {
        assert_close(v.normal, [0.0, 0.0, 1.0]);
    }
}

#[test]
fn should_keep_decoded_attributes() {
    let mesh = DecodedMesh {
        normals: Some(vec![[1.0, 0.0, 0.0]; 3]),
        tex_coords: Some(vec![[0.25, 0.5], [1.0, 0.0], [0.0, 1.0]]),
        ..triangle()
    };
    let vertices = mesh.build_vertices().expect("valid mesh");
    assert_eq!(vertices[0].normal, [1.0, 0.0, 0.0]);
    assert_eq!(vertices[0].tex_coords, [0.25, 0.5]);
    assert_eq!(vertices[2].position, [0.0, 1.0, 0.0]);
}

#[test]
fn should_reject_an_index_past_the_vertices() {
    let mesh = DecodedMesh {
        indices: vec![0, 1, 3],
        ..triangle()
    };
    assert_eq!(
        mesh.build_vertices(),
        Err(MeshError::IndexOutOfRange {
            index: 3,
            vertex_count: 3
        })
    );
}

#[test]
fn should_reject_indices_that_are_not_triangles() {
    let mesh = DecodedMesh {
        indices: vec![0, 1, 2, 0],
        ..triangle()
    };
    assert_eq!(mesh.validate_indices(), Err(MeshError::NotTriangulated(4)));
}

#[test]
fn should_average_normals_of_adjacent_faces() {
    // Two faces folded along the x axis: one facing +z, one facing +y.
    let positions = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, -1.0],
    ];
    let normals = smooth_normals(&positions, &[0, 1, 2, 0, 1, 3]);
    let diagonal = 1.0 / 2.0f32.sqrt();
    assert_close(normals[0], [0.0, diagonal, diagonal]);
    assert_close(normals[2], [0.0, 0.0, 1.0]);
    assert_close(normals[3], [0.0, 1.0, 0.0]);
}

#[test]
fn should_point_unused_vertices_up() {
    let normals = smooth_normals(&[[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [5.0; 3]], &[0, 1, 2]);
    assert_eq!(normals[3], [0.0, 1.0, 0.0]);
}

#[test]
fn should_walk_meshes_depth_first() {
    let root = DecodedNode {
        meshes: vec![named("root")],
        children: vec![
            DecodedNode {
                meshes: vec![named("house"), named("door")],
                children: vec![DecodedNode {
                    meshes: vec![named("handle")],
                    children: Vec::new(),
                }],
            },
            DecodedNode {
                meshes: vec![named("tree")],
                children: Vec::new(),
            },
        ],
    };

    let mut order = Vec::new();
    root.walk(&mut |mesh| order.push(mesh.name.clone()));
    assert_eq!(order, ["root", "house", "door", "handle", "tree"]);
}

#[test]
fn should_decode_a_triangulated_obj() {
    let obj = temp_path("decode_quad.obj");
    write_file(
        &obj,
        "o quad\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
         vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\nf 1/1 2/2 3/3 4/4\n",
    );

    let scene = decode_model(&obj).expect("obj decodes");
    assert!(scene.materials.is_empty());
    let mut meshes = Vec::new();
    scene.root.walk(&mut |mesh| meshes.push(mesh.clone()));
    assert_eq!(meshes.len(), 1);

    let quad = &meshes[0];
    assert_eq!(quad.positions.len(), 4);
    assert_eq!(quad.indices.len(), 6);
    assert_eq!(quad.material, None);
    assert!(quad.normals.is_none());
    // v is flipped so image rows line up.
    let uvs = quad.tex_coords.as_ref().expect("quad has UVs");
    assert_eq!(uvs[0], [0.0, 1.0]);
    assert_eq!(uvs[2], [1.0, 0.0]);

    for v in quad.build_vertices().expect("valid mesh") {
        assert_close(v.normal, [0.0, 0.0, 1.0]);
    }
}

#[test]
fn should_refuse_unknown_model_formats() {
    let path = temp_path("model.fbx");
    write_file(&path, "");
    assert!(decode_model(&path).is_err());
}
