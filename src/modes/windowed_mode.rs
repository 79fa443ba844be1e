use anyhow::{Context as _, Result};
use softbuffer::{Context, Surface};
use tracing::{error, info, warn};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Theme, Window, WindowId},
};

use std::{
    num::NonZeroU32,
    sync::mpsc::{self, SyncSender},
    thread,
    time::Duration,
};

use crate::data::{Command, Program};

type WindowSurface = Surface<&'static Window, &'static Window>;

struct WindowState {
    pub prog: Program,
    pub window: Option<&'static Window>,
    pub surface: Option<WindowSurface>,
    pub exit_sender: Option<SyncSender<()>>,
    pub final_buffer_size: PhysicalSize<u32>,
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // The window is leaked into a static reference, so a second
        // resume must not create another one.
        if self.window.is_some() {
            return;
        }

        self.prog.print_startup_info();

        let window_config = &self.prog.config().window;
        let win_size = PhysicalSize::<u32>::new(window_config.width, window_config.height);

        let window_attributes = Window::default_attributes()
            .with_title(window_config.title.clone())
            .with_inner_size(win_size)
            .with_transparent(false)
            .with_resizable(true)
            .with_theme(Some(Theme::Dark));

        let window: &'static Window = match event_loop.create_window(window_attributes) {
            Ok(w) => Box::leak(Box::new(w)),
            Err(e) => {
                error!("unable to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        self.window = Some(window);

        let size = window.inner_size();
        self.final_buffer_size = size;

        self.surface = match Context::new(window).and_then(|c| Surface::new(&c, window)) {
            Ok(mut surface) => {
                Self::resize_surface(&mut surface, size.width, size.height);
                Some(surface)
            }
            Err(e) => {
                error!("unable to create drawing surface: {e}");
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = self.prog.start(size.width, size.height) {
            error!("unable to place bubbles: {e}");
            event_loop.exit();
            return;
        }

        let (exit_send, exit_recv) = mpsc::sync_channel(1);

        self.exit_sender = Some(exit_send);

        let interval = self.prog.frame_interval();
        info!("requesting a frame every {:?}", interval);

        // Thread to control requesting redraws.
        let spawned = thread::Builder::new()
            .name("frame-timer".into())
            .spawn(move || frame_timer(window, interval, exit_recv));

        if let Err(e) = spawned {
            warn!("frame timer thread failed to start ({e}); redrawing on events only");
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        let command = match event {
            WindowEvent::CloseRequested => Command::Close,

            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                Command::Close
            }

            WindowEvent::CursorMoved { position, .. } => {
                Command::CursorMoved(position.x as f32, position.y as f32)
            }

            WindowEvent::CursorLeft { .. } => Command::CursorLeft,

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => Command::PointerDown,
                ElementState::Released => Command::PointerUp,
            },

            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.final_buffer_size = PhysicalSize::new(width, height);

                if let Some(surface) = self.surface.as_mut() {
                    Self::resize_surface(surface, width, height);
                }

                Command::Resize(width, height)
            }

            WindowEvent::RedrawRequested => {
                self.redraw();
                return;
            }

            _ => return,
        };

        if command.is_close_requested() {
            event_loop.exit();
            return;
        }

        if self.prog.eval_command(&command) {
            if let Some(w) = self.window.as_ref() {
                w.request_redraw()
            }
        }
    }
}

impl WindowState {
    // A minimised window reports a zero size; the old buffer is kept until
    // it comes back.
    fn resize_surface(surface: &mut WindowSurface, w: u32, h: u32) {
        let (Some(w), Some(h)) = (NonZeroU32::new(w), NonZeroU32::new(h)) else {
            return;
        };

        if let Err(e) = surface.resize(w, h) {
            warn!("failed to resize surface buffer: {e}");
        }
    }

    fn redraw(&mut self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        if !self.prog.render() {
            return;
        }

        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        match surface.buffer_mut() {
            Ok(mut buffer) => {
                self.prog
                    .pix
                    .present_to(&mut buffer, self.final_buffer_size.width as usize);

                window.pre_present_notify();
                if let Err(e) = buffer.present() {
                    warn!("failed to present frame: {e}");
                }
            }

            Err(e) => warn!("skipping frame, no buffer available: {e}"),
        }
    }
}

/// Re-arms the frame callback every `interval` until the exit signal fires.
fn frame_timer(window: &'static Window, interval: Duration, exit: mpsc::Receiver<()>) {
    loop {
        match exit.recv_timeout(interval) {
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            _ => break,
        }

        if !window.is_minimized().unwrap_or(false) {
            window.request_redraw();
        }
    }
}

pub fn winit_main(prog: Program) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;

    let mut state = WindowState {
        prog,
        window: None,
        surface: None,
        exit_sender: None,
        final_buffer_size: PhysicalSize::<u32>::new(0, 0),
    };

    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop
        .run_app(&mut state)
        .context("event loop terminated with an error")?;

    if let Some(sender) = state.exit_sender.as_ref() {
        let _ = sender.send(());
    }

    if !state.prog.world().is_running() {
        anyhow::bail!("the animation never started");
    }

    Ok(())
}
