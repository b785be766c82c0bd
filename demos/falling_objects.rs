use collision_mesh::config::{DEFAULT_CONCAVE_MARGIN, DEFAULT_PRIMITIVE_SEGMENTS};
use collision_mesh::core::primitives::cube_mesh;
use collision_mesh::*;
use image::{ImageBuffer, Rgb, Rgb32FImage};

fn main() -> Result<()> {
    // Pass a PNG path to use it as the terrain; a generated bowl is used otherwise.
    let field: Rgb32FImage = match std::env::args().nth(1) {
        Some(path) => load_height_field(path)?,
        None => ImageBuffer::from_fn(33, 33, |x, y| {
            let dx = x as f32 - 16.0;
            let dy = y as f32 - 16.0;
            Rgb([((dx * dx + dy * dy) / 512.0).min(1.0); 3])
        }),
    };

    let mut world = DynamicsWorld::new(WorldConfig {
        remove_expired: true,
        ..WorldConfig::default()
    });
    let mut cache = PrimitiveMeshCache::new();

    let mut params = HeightfieldParams::for_field(&field);
    params.scale = Vec3::new(1.0, 4.0, 1.0);
    let terrain = world.add(CollisionObject::rigid_terrain(
        &field,
        &params,
        0.0,
        Vec3::ZERO,
        Quat::IDENTITY,
    ));
    let terrain_mesh = world
        .object(terrain)
        .map(|object| object.vbo_mesh().vertex_count())
        .unwrap_or_default();
    println!("terrain: {terrain_mesh} vertices");

    for i in 0..6 {
        let x = i as f32 * 1.5 - 4.0;
        world.add(
            CollisionObject::rigid_box(
                &mut cache,
                Vec3::splat(0.8),
                1.0,
                Vec3::new(x, 8.0, 0.0),
                Quat::from_rotation_z(0.3 * i as f32),
            )
            .with_lifespan(2.0 + i as f64 * 0.5),
        );
        world.add(CollisionObject::rigid_sphere(
            &mut cache,
            0.4,
            DEFAULT_PRIMITIVE_SEGMENTS,
            0.5,
            Vec3::new(x, 10.0, 1.0),
            Quat::IDENTITY,
        ));
    }
    world.add(CollisionObject::rigid_cylinder(
        &mut cache,
        0.3,
        0.6,
        1.2,
        DEFAULT_PRIMITIVE_SEGMENTS,
        2.0,
        Vec3::new(0.0, 12.0, -1.0),
        Quat::IDENTITY,
    )?);
    // A static slab collided as a concave triangle mesh.
    world.add(CollisionObject::rigid_mesh(
        &cube_mesh(),
        Vec3::new(6.0, 0.5, 3.0),
        DEFAULT_CONCAVE_MARGIN,
        0.0,
        Vec3::new(0.0, 3.0, 4.0),
        Quat::from_rotation_x(-0.3),
    )?);
    println!("{} objects sharing {} cached meshes", world.len(), cache.len());

    let dt = 1.0 / 60.0;
    for frame in 0..=300 {
        for id in world.step(dt) {
            println!("frame {frame}: object {id:?} expired");
        }
        if frame % 60 == 0 {
            println!("t = {:.2}s", world.elapsed());
            for (id, object) in world.objects() {
                if object.kind() == ObjectKind::Terrain {
                    continue;
                }
                println!(
                    "  {:?} {:?} at {:.2?} age {:.2}",
                    id,
                    object.kind(),
                    object.position(),
                    object.age()
                );
            }
        }
    }
    Ok(())
}
