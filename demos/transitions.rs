use transit3d::{
    Mode, ObjectPatch, SceneConfig, TextureImage, backend::DrawCall, data_structures::object::ObjectState,
    flow, RenderBackend,
};

/// An 8x8 black and white checkerboard with a translucent white.
fn checkerboard() -> anyhow::Result<TextureImage> {
    let mut pixels = Vec::with_capacity(8 * 8 * 4);
    for y in 0..8 {
        for x in 0..8 {
            if (x + y) % 2 == 0 {
                pixels.extend_from_slice(&[20, 20, 20, 255]);
            } else {
                pixels.extend_from_slice(&[255, 255, 255, 128]);
            }
        }
    }
    Ok(TextureImage::from_rgba("checkerboard", 8, 8, pixels)?)
}

fn main() -> anyhow::Result<()> {
    let texture = checkerboard()?;
    flow::run(SceneConfig::default(), move |scene| {
        let setup = || -> transit3d::error::Result<()> {
            scene.light(ObjectPatch::new().position(0.5, -1.0, -0.5), None)?;
            scene.camera(ObjectPatch::new().z(5.0), None)?;

            // A planet with a moon orbiting it through the group hierarchy.
            scene.sphere(
                ObjectPatch::named("planet").position(0.0, 0.0, -20.0).size(3.0).color("48c").smooth(true),
                None,
            )?;
            scene.group(ObjectPatch::named("orbit").group("planet"), None)?;
            scene.sphere(
                ObjectPatch::named("moon").x(2.0).size(0.3).color("ccc").smooth(true).group("orbit"),
                None,
            )?;
            scene.move_object("orbit", ObjectPatch::new().ry(720.0).duration(8000.0), Some(500.0))?;

            // Transparent objects are drawn farthest first.
            scene.cube(ObjectPatch::named("glass").position(-4.0, 0.0, -12.0).size(2.0).color("f008"), None)?;
            scene.pyramid(ObjectPatch::named("tent").position(4.0, -1.0, -14.0).size(2.0).color("0f0"), None)?;
            scene.plane(
                ObjectPatch::named("floor")
                    .position(0.0, -3.0, -15.0)
                    .rotation(-90.0, 0.0, 0.0)
                    .scale(20.0, 20.0, 1.0)
                    .texture(texture),
                None,
            )?;
            scene.billboard(ObjectPatch::named("sign").position(0.0, 4.0, -18.0).scale(3.0, 1.0, 1.0).color("fa0"), None)?;

            // Slide the cube across, then bring it back.
            scene.move_object("glass", ObjectPatch::new().x(4.0).rz(180.0).duration(2000.0), Some(1000.0))?;
            scene.move_object("glass", ObjectPatch::new().x(-4.0).rz(0.0).duration(2000.0), Some(3500.0))?;
            scene.move_object("tent", ObjectPatch::new().mode(Mode::LineStrip), Some(2000.0))?;

            // Objects can hand their draw to custom code.
            scene.register_renderer("wire", |_: &ObjectState, call: &DrawCall, backend: &mut dyn RenderBackend| {
                let mut call = call.clone();
                call.mode = Mode::Lines;
                backend.draw(&call);
            });
            scene.cube(ObjectPatch::named("frame").position(0.0, 0.0, -8.0).renderer("wire").color("000"), None)?;
            scene.delete("frame", Some(6000.0));
            Ok(())
        };
        if let Err(e) = setup() {
            log::error!("scene setup failed: {}", e);
        }
    })
}
