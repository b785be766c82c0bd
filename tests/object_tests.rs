use collision_mesh::rapier3d::dynamics::RigidBodySet;
use collision_mesh::{
    CollisionObject, ObjectKind, ObjectState, PrimitiveMeshCache, Quat, ShapeError, TriMesh, Vec3,
};

fn tetrahedron() -> TriMesh {
    TriMesh::new(
        vec![
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(0.0, -1.0, -1.0),
        ],
        vec![0, 1, 2, 0, 2, 3, 0, 3, 1, 1, 3, 2],
    )
}

#[test]
fn age_accumulates_every_delta_without_clamping() {
    let mut cache = PrimitiveMeshCache::new();
    let mut object =
        CollisionObject::rigid_sphere(&mut cache, 1.0, 8, 1.0, Vec3::ZERO, Quat::IDENTITY);
    let bodies = RigidBodySet::new();

    let deltas = [0.25, 0.5, -0.125, 1.0, 0.0, -0.5];
    let mut expected = 0.0;
    for dt in deltas {
        object.update(dt, &bodies);
        expected += dt;
        assert_eq!(object.age(), expected);
    }
    assert_eq!(object.age(), 1.125);
}

#[test]
fn expiry_is_only_observed() {
    let mut cache = PrimitiveMeshCache::new();
    let bodies = RigidBodySet::new();
    let mut object = CollisionObject::rigid_box(&mut cache, Vec3::ONE, 1.0, Vec3::ZERO, Quat::IDENTITY)
        .with_lifespan(1.0);

    for _ in 0..3 {
        object.update(0.25, &bodies);
        assert!(!object.is_expired());
    }
    object.update(0.25, &bodies);
    assert!(object.is_expired());
    assert!(object.age() >= object.lifespan().expect("finite lifespan"));

    // Nothing was torn down by the object itself.
    object.update(0.25, &bodies);
    assert_eq!(object.age(), 1.25);
    assert!(object.pending_body().is_some());
    assert_eq!(object.vbo_mesh().index_count(), 36);
}

#[test]
fn objects_without_lifespan_never_expire() {
    let mut cache = PrimitiveMeshCache::new();
    let mut object = CollisionObject::rigid_box(&mut cache, Vec3::ONE, 1.0, Vec3::ZERO, Quat::IDENTITY);
    object.update(1.0e9, &RigidBodySet::new());
    assert!(!object.is_expired());
    assert_eq!(object.state(), ObjectState::Constructed);
}

#[test]
fn lifespan_can_be_changed_after_construction() {
    let mut cache = PrimitiveMeshCache::new();
    let bodies = RigidBodySet::new();
    let mut object = CollisionObject::rigid_box(&mut cache, Vec3::ONE, 1.0, Vec3::ZERO, Quat::IDENTITY)
        .with_lifespan(0.5);
    object.update(1.0, &bodies);
    assert!(object.is_expired());

    object.set_lifespan(Some(2.0));
    assert!(!object.is_expired());
    object.update(1.0, &bodies);
    assert!(object.is_expired());

    object.set_lifespan(None);
    assert_eq!(object.lifespan(), None);
    assert!(!object.is_expired());
}

#[test]
fn primitive_objects_share_cached_meshes() {
    let mut cache = PrimitiveMeshCache::new();
    let a = CollisionObject::rigid_box(&mut cache, Vec3::ONE, 1.0, Vec3::ZERO, Quat::IDENTITY);
    let b = CollisionObject::rigid_box(&mut cache, Vec3::splat(3.0), 2.0, Vec3::X, Quat::IDENTITY);
    let c = CollisionObject::rigid_cylinder(&mut cache, 0.5, 0.5, 2.0, 12, 1.0, Vec3::ZERO, Quat::IDENTITY)
        .expect("cylinder");
    let d = CollisionObject::rigid_cylinder(&mut cache, 1.0, 1.0, 4.0, 12, 1.0, Vec3::ZERO, Quat::IDENTITY)
        .expect("cylinder");

    assert!(a.vbo_mesh().shares_buffer_with(b.vbo_mesh()));
    assert_eq!(b.scale(), Vec3::splat(3.0));
    // Same radius to height ratio, same mesh.
    assert!(c.vbo_mesh().shares_buffer_with(d.vbo_mesh()));
    assert_eq!(d.scale(), Vec3::splat(4.0));
    assert_eq!(cache.len(), 2);
}

#[test]
fn hull_and_mesh_reuse_caller_geometry() {
    let mesh = tetrahedron();
    let hull = CollisionObject::rigid_hull(&mesh, Vec3::splat(2.0), 1.0, Vec3::ZERO, Quat::IDENTITY)
        .expect("hull");
    let concave =
        CollisionObject::rigid_mesh(&mesh, Vec3::ONE, 0.04, 0.0, Vec3::ZERO, Quat::IDENTITY)
            .expect("trimesh");

    assert_eq!(hull.kind(), ObjectKind::Hull);
    assert_eq!(hull.vbo_mesh().positions(), mesh.positions.as_slice());
    assert_eq!(hull.scale(), Vec3::splat(2.0));
    assert_eq!(concave.kind(), ObjectKind::Mesh);
    assert_eq!(concave.vbo_mesh().indices(), mesh.indices.as_slice());
    let desc = concave.pending_body().expect("pending");
    assert!(desc.collider().shape().as_trimesh().is_some());
}

#[test]
fn malformed_index_buffers_are_reported() {
    let mut mesh = tetrahedron();
    mesh.indices.pop();
    let result = CollisionObject::rigid_mesh(&mesh, Vec3::ONE, 0.04, 0.0, Vec3::ZERO, Quat::IDENTITY);
    assert!(matches!(result, Err(ShapeError::InvalidIndexCount(11))));
}

#[test]
fn matrix_combines_pose_and_scale() {
    let mut cache = PrimitiveMeshCache::new();
    let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
    let object = CollisionObject::rigid_box(
        &mut cache,
        Vec3::new(2.0, 1.0, 1.0),
        1.0,
        Vec3::new(0.0, 5.0, 0.0),
        rotation,
    );
    let tip = object.matrix().transform_point3(Vec3::new(0.5, 0.0, 0.0));
    assert!(tip.abs_diff_eq(Vec3::new(0.0, 5.0, -1.0), 1e-5));
}
