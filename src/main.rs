//! Koi Pond entry point
//!
//! On the web this mounts the pond SVG and runs the animation loop. Natively
//! it simulates a pond and writes an SVG snapshot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_pond {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, MouseEvent, Window};

    use koi_pond::consts::{MAX_SUBSTEPS, SIM_DT};
    use koi_pond::platform::Viewport;
    use koi_pond::renderer::svg::SVG_NS;
    use koi_pond::renderer::{build_scene, to_svg_fragment};
    use koi_pond::sim::{Scene, TickInput, tick};
    use koi_pond::{PondError, PondResult, Settings};

    /// Pond instance holding all state
    struct Pond {
        scene: Scene,
        settings: Settings,
        svg: Element,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
    }

    impl Pond {
        fn new(scene: Scene, settings: Settings, svg: Element) -> Self {
            Self {
                scene,
                settings,
                svg,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            // A backgrounded tab can hand us seconds at once
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.scene, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.spawns.clear();
            }
        }

        fn render(&self) {
            let markup = to_svg_fragment(&build_scene(&self.scene));
            self.svg.set_inner_html(&markup);
        }

        /// Canvas position under a click, `None` outside the pond
        fn click_to_logical(&self, event: &MouseEvent) -> Option<Vec2> {
            let rect = self.svg.get_bounding_client_rect();
            let viewport = Viewport::new(
                rect.width() as f32,
                rect.height() as f32,
                self.scene.canvas,
                self.settings.fit_mode,
                self.settings.align,
            );
            let p = Vec2::new(
                (event.client_x() as f64 - rect.left()) as f32,
                (event.client_y() as f64 - rect.top()) as f32,
            );
            viewport.screen_to_logical(p)
        }
    }

    fn js_err(value: JsValue) -> PondError {
        PondError::dom(format!("{value:?}"))
    }

    fn prefers_reduced_motion(window: &Window) -> bool {
        window
            .match_media("(prefers-reduced-motion: reduce)")
            .ok()
            .flatten()
            .map(|m| m.matches())
            .unwrap_or(false)
    }

    fn create_svg(window: &Window, settings: &Settings) -> PondResult<Element> {
        let document = window.document().ok_or(PondError::MissingWindow)?;
        let container = document
            .get_element_by_id("pond-container")
            .ok_or_else(|| PondError::missing_element("pond-container"))?;

        let svg = document
            .create_element_ns(Some(SVG_NS), "svg")
            .map_err(js_err)?;
        let canvas = settings.canvas();
        let view_box = format!("0 0 {} {}", canvas.width, canvas.height);
        let aspect = Viewport::preserve_aspect_ratio(settings.fit_mode, settings.align);
        for (name, value) in [
            ("id", "pond"),
            ("width", "100%"),
            ("height", "100%"),
            ("viewBox", view_box.as_str()),
            ("preserveAspectRatio", aspect),
        ] {
            svg.set_attribute(name, value).map_err(js_err)?;
        }
        container.append_child(&svg).map_err(js_err)?;
        Ok(svg)
    }

    pub fn run() -> PondResult<()> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Koi pond starting...");

        let window = web_sys::window().ok_or(PondError::MissingWindow)?;

        let mut settings = Settings::load();
        if prefers_reduced_motion(&window) {
            log::info!("Reduced motion requested, disabling wiggle and sway");
            settings.reduced_motion = true;
        }

        let svg = create_svg(&window, &settings)?;

        // Initialize pond
        let seed = js_sys::Date::now() as u64;
        let scene = Scene::new(seed, &settings);
        let pond = Rc::new(RefCell::new(Pond::new(scene, settings, svg)));
        pond.borrow().render();

        setup_click_handler(&window, pond.clone())?;

        // Start animation loop
        request_animation_frame(pond);

        log::info!("Koi pond running!");
        Ok(())
    }

    fn setup_click_handler(window: &Window, pond: Rc<RefCell<Pond>>) -> PondResult<()> {
        let document = window.document().ok_or(PondError::MissingWindow)?;
        let container = document
            .get_element_by_id("pond-container")
            .ok_or_else(|| PondError::missing_element("pond-container"))?;

        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let mut p = pond.borrow_mut();
            match p.click_to_logical(&event) {
                Some(pos) => p.input.spawns.push(pos),
                None => log::debug!("Click outside the pond ignored"),
            }
        });
        container
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(js_err)?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(pond: Rc<RefCell<Pond>>) {
        let Some(window) = web_sys::window() else {
            log::warn!("Window went away, stopping the animation loop");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            pond_loop(pond, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn pond_loop(pond: Rc<RefCell<Pond>>, time: f64) {
        {
            let mut p = pond.borrow_mut();

            // Calculate delta time
            let dt = if p.last_time > 0.0 {
                ((time - p.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            p.last_time = time;

            p.update(dt);
            p.render();
        }

        request_animation_frame(pond);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_pond::run() {
        log::error!("Koi pond failed to start: {e}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native_cli {
    use std::path::PathBuf;

    use clap::Parser;
    use glam::Vec2;

    use koi_pond::renderer::{build_scene, to_svg_document};
    use koi_pond::sim::{Scene, run_for};
    use koi_pond::{PondDensity, PondError, PondResult, Settings};

    /// Simulate a koi pond and write an SVG snapshot
    #[derive(Parser, Debug)]
    #[command(name = "koi-pond", version)]
    pub struct Cli {
        /// Scene seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Exact number of lily pads to place
        #[arg(long)]
        lily_pads: Option<u32>,

        /// Density preset: sparse, normal or lush
        #[arg(long)]
        density: Option<String>,

        /// Seconds to simulate before the snapshot
        #[arg(long, default_value_t = 0.0)]
        seconds: f32,

        /// Settings JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output SVG path (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Spawn a koi at X,Y before simulating (repeatable)
        #[arg(long, value_parser = parse_point)]
        spawn: Vec<Vec2>,
    }

    fn parse_point(s: &str) -> Result<Vec2, String> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
        let x: f32 = x.trim().parse().map_err(|e| format!("bad x {x:?}: {e}"))?;
        let y: f32 = y.trim().parse().map_err(|e| format!("bad y {y:?}: {e}"))?;
        Ok(Vec2::new(x, y))
    }

    fn settings_from(cli: &Cli) -> PondResult<Settings> {
        let mut settings = match &cli.config {
            Some(path) => Settings::from_file(path)?,
            None => Settings::load(),
        };
        if let Some(name) = &cli.density {
            settings.density = PondDensity::from_name(name)
                .ok_or_else(|| PondError::config(format!("unknown density {name:?}")))?;
        }
        if let Some(count) = cli.lily_pads {
            settings.lily_pad_count = Some(count);
        }
        Ok(settings)
    }

    pub fn run() -> PondResult<()> {
        env_logger::init();
        let cli = Cli::parse();
        let settings = settings_from(&cli)?;

        let seed = cli.seed.unwrap_or_else(rand::random);
        let mut scene = Scene::new(seed, &settings);
        for &pos in &cli.spawn {
            if scene.spawn_koi_at(pos).is_none() {
                log::warn!("Spawn point {pos} is outside the pond");
            }
        }
        let ticks = run_for(&mut scene, cli.seconds);
        log::info!("Simulated {ticks} ticks ({:.1}s)", scene.time);

        let doc = to_svg_document(
            &build_scene(&scene),
            scene.canvas,
            settings.fit_mode,
            settings.align,
        );
        match &cli.out {
            Some(path) => {
                std::fs::write(path, doc)?;
                log::info!("Wrote {}", path.display());
            }
            None => print!("{doc}"),
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_point() {
            assert_eq!(parse_point("10,20.5"), Ok(Vec2::new(10.0, 20.5)));
            assert_eq!(parse_point(" 1 , 2 "), Ok(Vec2::new(1.0, 2.0)));
            assert!(parse_point("10").is_err());
            assert!(parse_point("a,2").is_err());
        }

        #[test]
        fn test_cli_overrides_settings() {
            let cli = Cli::parse_from([
                "koi-pond",
                "--lily-pads",
                "4",
                "--density",
                "lush",
                "--spawn",
                "100,100",
                "--spawn",
                "200,200",
            ]);
            let settings = settings_from(&cli).unwrap();
            assert_eq!(settings.lily_pad_count, Some(4));
            assert_eq!(settings.density, PondDensity::Lush);
            assert_eq!(cli.spawn.len(), 2);
        }

        #[test]
        fn test_unknown_density_is_config_error() {
            let cli = Cli::parse_from(["koi-pond", "--density", "swamp"]);
            assert!(matches!(settings_from(&cli), Err(PondError::Config(_))));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> koi_pond::PondResult<()> {
    native_cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
