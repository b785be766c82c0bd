use collision_mesh::{
    create_body, create_box, create_cylinder, create_sphere, Quat, ShapeKind, Vec3,
};

#[test]
fn inertia_is_zero_only_for_massless_bodies() {
    let masses = [0.0_f32, 0.5, 1.0, 12.0];
    for mass in masses {
        let shapes = [
            create_box(Vec3::new(1.0, 2.0, 3.0)),
            create_sphere(0.75),
            create_cylinder(0.5, 0.5, 2.0, 16).expect("cylinder"),
        ];
        for shape in shapes {
            let desc = create_body(shape, mass, Vec3::ZERO, Quat::IDENTITY);
            let inertia_is_zero = desc.local_inertia() == Vec3::ZERO;
            assert_eq!(
                inertia_is_zero,
                mass == 0.0,
                "mass {mass} gave inertia {:?}",
                desc.local_inertia()
            );
        }
    }
}

#[test]
fn motion_state_matches_requested_pose() {
    let position = Vec3::new(3.0, -4.0, 12.5);
    let rotation = Quat::from_rotation_x(0.4) * Quat::from_rotation_z(-1.1);
    let desc = create_body(create_box(Vec3::ONE), 2.0, position, rotation);

    assert_eq!(desc.motion_state().position, position);
    assert_eq!(desc.motion_state().rotation, rotation);

    let iso = desc.body().position();
    assert_eq!(iso.translation.vector.x, position.x);
    assert_eq!(iso.translation.vector.y, position.y);
    assert_eq!(iso.translation.vector.z, position.z);
    assert_eq!(iso.rotation.quaternion().w, rotation.w);
}

#[test]
fn body_keeps_shape_and_mass() {
    let desc = create_body(create_sphere(1.0), 3.0, Vec3::ZERO, Quat::IDENTITY);
    assert_eq!(desc.shape_kind(), ShapeKind::Sphere);
    assert_eq!(desc.mass(), 3.0);
    assert!(desc.collider().shape().as_ball().is_some());
    assert!(desc.body().is_dynamic());
}

#[test]
fn negative_mass_is_passed_through() {
    let desc = create_body(create_box(Vec3::ONE), -1.0, Vec3::ZERO, Quat::IDENTITY);
    assert_eq!(desc.mass(), -1.0);
    assert!(!desc.is_static());
    assert!(desc.local_inertia().x < 0.0);
}

#[test]
fn solid_box_inertia_matches_closed_form() {
    let size = Vec3::new(2.0, 4.0, 6.0);
    let mass = 3.0;
    let desc = create_body(create_box(size), mass, Vec3::ZERO, Quat::IDENTITY);

    let expected_x = mass / 12.0 * (size.y * size.y + size.z * size.z);
    let inertia = desc.local_inertia();
    assert!((inertia.x - expected_x).abs() / expected_x < 1e-4);
}
