use crate::config;
use crate::events::AppEvent;
use crate::gui::reel::{self, Reel};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window;
use gtk::prelude::*;
use gtk4 as gtk;
use gdk_pixbuf::Pixbuf;
use orbit::{Activation, FrameTicket, LayoutKind, SourceRef};
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppModel {
    pub reel: Rc<RefCell<Reel>>,
    pub visible: bool,
    pub drawing_area: gtk::DrawingArea,
    tick: Option<gtk::TickCallbackId>,
}

#[derive(Debug)]
pub enum AppMsg {
    Show,
    Hide,
    SetLayout(LayoutKind),
    ConfigReload,
    ImageLoaded(SourceRef, Option<Pixbuf>),
    DragBegin(f64),
    DragUpdate(f64),
    DragEnd,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Show => AppMsg::Show,
            AppEvent::Hide => AppMsg::Hide,
            AppEvent::SetLayout(kind) => AppMsg::SetLayout(kind),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
            AppEvent::ImageLoaded(source, pixbuf) => AppMsg::ImageLoaded(source, pixbuf),
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Reel, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Keepsake"),
            #[watch]
            set_visible: model.visible,
            add_css_class: "keepsake-window",
            set_decorated: false,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Hide);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "keepsake-drawing-area",

                add_controller = gtk::GestureDrag {
                    connect_drag_begin[sender] => move |_, x, _| {
                        sender.input(AppMsg::DragBegin(x));
                    },
                    connect_drag_update[sender] => move |_, offset_x, _| {
                        sender.input(AppMsg::DragUpdate(offset_x));
                    },
                    connect_drag_end[sender] => move |_, _, _| {
                        sender.input(AppMsg::DragEnd);
                    },
                    connect_cancel[sender] => move |_, _| {
                        sender.input(AppMsg::DragEnd);
                    }
                },

                add_controller = gtk::EventControllerMotion {
                    connect_leave[sender] => move |_| {
                        sender.input(AppMsg::DragEnd);
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
        let (reel, rx) = init;

        theme::load_css();
        window::init_layer_shell(&root);

        let model = AppModel {
            reel: Rc::new(RefCell::new(reel)),
            visible: false,
            drawing_area: gtk::DrawingArea::default(),
            tick: None,
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let reel_draw = model.reel.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let mut state = reel_draw.borrow_mut();
                if let Err(e) = reel::draw(cr, &mut state, width as f64, height as f64, &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        root.set_visible(false);

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Show => {
                self.visible = true;
                let activation = self.reel.borrow_mut().activate(true);
                if let Activation::Started(ticket) = activation {
                    self.start_ticking(ticket);
                    log::info!("{} layout ready", self.reel.borrow().kind());
                }
                self.drawing_area.queue_draw();
            }
            AppMsg::Hide => {
                let _ = self.reel.borrow_mut().activate(false);
                self.stop_ticking();
                self.visible = false;
            }
            AppMsg::SetLayout(kind) => {
                self.reel.borrow_mut().set_layout(kind);
                self.drawing_area.queue_draw();
                log::info!("Switched to {} layout", kind);
            }
            AppMsg::DragBegin(x) => self.reel.borrow_mut().drag_begin(x),
            AppMsg::DragUpdate(offset_x) => self.reel.borrow_mut().drag_update(offset_x),
            AppMsg::DragEnd => self.reel.borrow_mut().drag_end(),
            AppMsg::ImageLoaded(source, pixbuf) => {
                self.reel.borrow_mut().images.finish(&source, pixbuf);
                self.drawing_area.queue_draw();
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    self.reel.borrow_mut().apply_config(&new_config);
                    self.drawing_area.queue_draw();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}

impl AppModel {
    /// One driver tick per display refresh until the ticket goes stale.
    fn start_ticking(&mut self, ticket: FrameTicket) {
        self.stop_ticking();

        let reel = self.reel.clone();
        let id = self.drawing_area.add_tick_callback(move |area, _clock| {
            if reel.borrow_mut().tick(ticket) {
                area.queue_draw();
                glib::ControlFlow::Continue
            } else {
                glib::ControlFlow::Break
            }
        });
        self.tick = Some(id);
    }

    fn stop_ticking(&mut self) {
        if let Some(id) = self.tick.take() {
            id.remove();
        }
    }
}
