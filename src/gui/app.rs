use crate::config::{self, Appearance, Config};
use crate::events::AppEvent;
use crate::gui::menu::{
    self, Hit, MenuAnimator, MenuGeometry, MenuIcons, MenuState, Point, Transition,
};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use crate::sys::icon;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Everything the draw function and the tick callback read.
pub struct MenuScene {
    pub state: MenuState,
    pub animator: MenuAnimator,
    pub appearance: Appearance,
    pub icons: MenuIcons,
}

impl MenuScene {
    pub fn new(appearance: Appearance) -> Self {
        let state = MenuState::new();
        let animator = MenuAnimator::new(&state);
        Self {
            state,
            animator,
            appearance,
            icons: MenuIcons::load(),
        }
    }

    pub fn geometry(&self, width: f64, height: f64) -> MenuGeometry {
        MenuGeometry::new(
            width,
            height,
            self.appearance.padding,
            self.appearance.button_size,
        )
    }

    /// Flips the menu inside the ambient transition and retargets the springs.
    pub fn toggle(&mut self) {
        let frames = self.state.toggle(Transition::AMBIENT);
        self.animator
            .apply(&frames, Transition::AMBIENT, self.state.is_expanded());
    }
}

pub struct AppModel {
    pub scene: Rc<RefCell<MenuScene>>,
    pub ticking: Rc<Cell<bool>>,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    Toggle,
    Tap(Point),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Toggle => AppMsg::Toggle,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl AppModel {
    fn toggle(&self) {
        self.scene.borrow_mut().toggle();
        self.start_animation();
        self.drawing_area.queue_draw();
    }

    /// Steps the springs once per frame until they settle. Only one tick
    /// callback runs at a time; later toggles just retarget the springs.
    fn start_animation(&self) {
        if self.ticking.replace(true) {
            return;
        }

        let scene = self.scene.clone();
        let ticking = self.ticking.clone();
        let last_frame: Cell<Option<i64>> = Cell::new(None);

        self.drawing_area.add_tick_callback(move |area, clock| {
            let now = clock.frame_time();
            let dt = last_frame
                .replace(Some(now))
                .map(|prev| (now - prev) as f64 / 1_000_000.0)
                .unwrap_or(0.0);

            let moving = scene.borrow_mut().animator.step(dt);
            area.queue_draw();

            if moving {
                glib::ControlFlow::Continue
            } else {
                ticking.set(false);
                glib::ControlFlow::Break
            }
        });
    }

    fn tap(&self, point: Point) {
        let hit = {
            let scene = self.scene.borrow();
            let geometry = scene.geometry(
                self.drawing_area.width() as f64,
                self.drawing_area.height() as f64,
            );
            geometry.hit_test(point, &scene.state)
        };

        match hit {
            Some(Hit::Trigger) => self.toggle(),
            Some(Hit::Satellite(kind)) => log::debug!("{} tapped", kind.label()),
            None => {}
        }
    }

    fn reload_config(&self) {
        match config::load_config() {
            Ok(new_config) => {
                window::apply_size(&self.root, &new_config.appearance);
                icon::clear_cache();
                {
                    let mut scene = self.scene.borrow_mut();
                    scene.appearance = new_config.appearance;
                    scene.icons = MenuIcons::load();
                }
                self.drawing_area.queue_draw();
                log::info!("Configuration reloaded");
            }
            Err(e) => log::error!("Failed to reload config: {}", e),
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("GlassPath"),
            add_css_class: "glasspath-window",
            set_decorated: false,
            set_resizable: false,

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "glasspath-canvas",

                add_controller = gtk::GestureClick {
                    set_button: gtk::gdk::BUTTON_PRIMARY,
                    connect_released[sender] => move |_, _, x, y| {
                        sender.input(AppMsg::Tap(Point::new(x, y)));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);
        window::apply_size(&root, &config.appearance);

        let model = AppModel {
            scene: Rc::new(RefCell::new(MenuScene::new(config.appearance))),
            ticking: Rc::new(Cell::new(false)),
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let scene_draw = model.scene.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let scene = scene_draw.borrow();
                let colors =
                    ThemeColors::from_context(&drawing_area.style_context(), &scene.appearance);
                let geometry = scene.geometry(width as f64, height as f64);
                if let Err(e) =
                    menu::draw(cr, &geometry, &scene.animator, &scene.icons, &colors)
                {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Toggle => self.toggle(),
            AppMsg::Tap(point) => self.tap(point),
            AppMsg::ConfigReload => self.reload_config(),
        }
    }
}
