//! Application event loop.
//!
//! [`run`] opens a window, builds the wgpu [`Context`] and hands a
//! [`Scene`] to a setup closure. Afterwards every redraw calls
//! [`Scene::draw`] with the milliseconds elapsed since startup and requests
//! the next frame.
//!
//! Natively the context is created by blocking on a tokio runtime. On the web
//! initialization is spawned and the finished context comes back to the event
//! loop as a user event.

use std::{fmt::Debug, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    context::Context,
    scene::{Scene, SceneConfig},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

type Setup = Box<dyn FnOnce(&mut Scene<Context>)>;

pub(crate) enum FlowEvent {
    #[allow(dead_code)]
    Initialized(Box<Context>),
    #[allow(dead_code)]
    Failed(String),
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(_) => f.write_str("Initialized(Context)"),
            Self::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    config: Option<SceneConfig>,
    setup: Option<Setup>,
    scene: Option<Scene<Context>>,
    start: Instant,
}

impl App {
    fn new(
        event_loop: &EventLoop<FlowEvent>,
        config: SceneConfig,
        setup: Setup,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config: Some(config),
            setup: Some(setup),
            scene: None,
            start: Instant::now(),
        })
    }

    fn initialized(&mut self, ctx: Context) {
        let size = ctx.window().inner_size();
        let config = self.config.take().unwrap_or_default();
        let mut scene = Scene::new(ctx, config);
        scene.resize(size.width, size.height);
        if let Some(setup) = self.setup.take() {
            setup(&mut scene);
        }
        scene.backend().window().request_redraw();
        self.start = Instant::now();
        self.scene = Some(scene);
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.scene.is_some() || self.setup.is_none() {
            return;
        }

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("transit3d");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Could not create a window: {}", e);
                event_loop.exit();
                return;
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(Context::new(window)) {
                Ok(ctx) => self.initialized(ctx),
                Err(e) => {
                    log::error!("Could not initialize the renderer: {:#}", e);
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match Context::new(window).await {
                    Ok(ctx) => FlowEvent::Initialized(Box::new(ctx)),
                    Err(e) => FlowEvent::Failed(format!("{:#}", e)),
                };
                if proxy.send_event(event).is_err() {
                    log::error!("event loop closed before the renderer was ready");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            // This is the message from our wasm `spawn_local`
            FlowEvent::Initialized(ctx) => self.initialized(*ctx),
            FlowEvent::Failed(e) => {
                log::error!("Could not initialize the renderer: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let scene = match &mut self.scene {
            Some(scene) => scene,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                scene.backend_mut().resize(size.width, size.height);
                scene.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                let now = self.start.elapsed().as_secs_f64() * 1000.0;
                if let Err(e) = scene.draw(now) {
                    log::error!("Unable to render {:#}", e);
                    if let Some(wgpu::SurfaceError::OutOfMemory) = e.downcast_ref::<wgpu::SurfaceError>() {
                        event_loop.exit();
                        return;
                    }
                }
                scene.backend().window().request_redraw();
            }
            _ => {}
        }
    }
}

/// Open a window and render `setup`'s scene until the window is closed.
pub fn run(
    config: SceneConfig,
    setup: impl FnOnce(&mut Scene<Context>) + 'static,
) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config, Box::new(setup))?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
