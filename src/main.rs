use iced::widget::{self, button, column, container, horizontal_space, row, slider, text, Column};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use image::RgbaImage;
use rfd::FileDialog;
use std::time::{Duration, Instant};

mod filter;
mod import;
mod state;
mod ui;

use filter::FilterKind;
use state::album::{Album, AlbumPaths};
use state::session::{FilterSession, Snapshot};
use state::settings::Settings;
use ui::notification::{self, Notification};
use ui::transition::{Phase, Transition};

/// Interval between animation frames while fading
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Main application state
struct Instafilter {
    /// Source image, filter and intensity, plus the rendered output
    session: FilterSession,
    /// Fade sequence around picture imports
    transition: Transition,
    /// Display handle for the current output
    preview: Option<widget::image::Handle>,
    /// The filter chooser replaces the editing controls while open
    choosing_filter: bool,
    /// Modal notification; hides everything else while shown
    notification: Option<Notification>,
    album_paths: AlbumPaths,
    working_size: u32,
    /// Status line shown under the controls
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Import"
    ImportPicture,
    /// Background decode finished
    PictureLoaded(Result<RgbaImage, String>),
    /// Animation frame while fading
    Tick(Instant),
    /// User opened the filter chooser
    ChangeFilter,
    FilterChosen(FilterKind),
    CancelFilterChoice,
    IntensityChanged(f32),
    /// User clicked "Save"
    Save,
    /// Background save completed
    SaveFinished(Notification),
    DismissNotification,
}

impl Instafilter {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::load_or_init(&Settings::default_path());
        let album_paths = AlbumPaths::platform(settings.album_dir.as_deref());

        // The app still runs without an album; saving will report the problem
        match Album::open(&album_paths) {
            Ok(album) => {
                if let Err(e) = album.verify_files() {
                    log::warn!("Could not verify album files: {}", e);
                }
                let count = album.photo_count().unwrap_or(0);
                log::info!("Instafilter initialized with {} photos in album", count);
                if let Ok(recent) = album.recent_photos(1) {
                    if let Some(last) = recent.first() {
                        log::info!("Last saved: {} ({})", last.filename, last.filter);
                    }
                }
            }
            Err(e) => log::warn!("Album unavailable: {}", e),
        }

        let status = format!("Saving to {}", album_paths.photos_dir.display());

        (
            Instafilter {
                session: FilterSession::new(settings.default_filter, settings.default_intensity),
                transition: Transition::new(settings.fade_duration()),
                preview: None,
                choosing_filter: false,
                notification: None,
                album_paths,
                working_size: settings.working_size,
                status,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ImportPicture => {
                if !self.transition.begin_picking() {
                    return Task::none();
                }

                // Show the native file picker dialog
                let picked = FileDialog::new()
                    .set_title("Import Picture")
                    .add_filter("Pictures", &import::PICTURE_EXTENSIONS)
                    .pick_file();

                match picked {
                    Some(path) => Task::perform(
                        import::load_picture(path, self.working_size),
                        Message::PictureLoaded,
                    ),
                    None => {
                        self.transition.cancel_picking();
                        Task::none()
                    }
                }
            }
            Message::PictureLoaded(Ok(picture)) => {
                self.transition.picked(picture, Instant::now());
                Task::none()
            }
            Message::PictureLoaded(Err(e)) => {
                log::warn!("Import failed: {}", e);
                self.transition.cancel_picking();
                Task::none()
            }
            Message::Tick(now) => {
                if let Some(picture) = self.transition.tick(now) {
                    self.session.load_image(picture);
                    self.refresh_preview();
                }
                Task::none()
            }
            Message::ChangeFilter => {
                self.choosing_filter = true;
                Task::none()
            }
            Message::FilterChosen(kind) => {
                self.choosing_filter = false;
                if self.session.select_filter(kind) {
                    self.refresh_preview();
                }
                Task::none()
            }
            Message::CancelFilterChoice => {
                self.choosing_filter = false;
                Task::none()
            }
            Message::IntensityChanged(value) => {
                self.session.set_intensity(value);
                self.refresh_preview();
                Task::none()
            }
            Message::Save => Task::perform(
                save_snapshot_async(self.album_paths.clone(), self.session.snapshot()),
                Message::SaveFinished,
            ),
            Message::SaveFinished(outcome) => {
                self.notification = Some(outcome);
                Task::none()
            }
            Message::DismissNotification => {
                self.notification = None;
                Task::none()
            }
        }
    }

    fn refresh_preview(&mut self) {
        self.preview = self.session.output().map(|output| {
            widget::image::Handle::from_rgba(output.width(), output.height(), output.as_raw().clone())
        });
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        if let Some(notification) = &self.notification {
            return notification_view(notification);
        }

        let picture: Element<Message> = match &self.preview {
            Some(handle) => widget::image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .opacity(self.transition.alpha())
                .into(),
            None => container(text("Import a picture to get started").size(18))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        };

        let controls = if self.choosing_filter {
            self.filter_chooser()
        } else {
            self.editing_controls()
        };

        let content: Column<Message> = column![
            row![
                text("Instafilter").size(32),
                horizontal_space(),
                button("Import")
                    .on_press(Message::ImportPicture)
                    .padding(10),
            ]
            .align_y(Alignment::Center),
            container(picture).width(Length::Fill).height(Length::Fill),
            controls,
            text(self.status_line()).size(14),
        ]
        .spacing(16)
        .padding(20);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn status_line(&self) -> String {
        if self.transition.phase() == &Phase::Picking {
            return "Opening picture...".to_string();
        }
        match self.session.source() {
            Some(source) => format!(
                "{}x{} | {}",
                source.width(),
                source.height(),
                self.status
            ),
            None => self.status.clone(),
        }
    }

    fn editing_controls(&self) -> Element<'_, Message> {
        let intensity = row![
            text("Intensity"),
            slider(
                0.0..=1.0,
                self.session.intensity().value(),
                Message::IntensityChanged
            )
            .step(0.01),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let actions = row![
            button(text(format!("Filter: {}", self.session.filter().title())))
                .on_press(Message::ChangeFilter)
                .padding(10),
            horizontal_space(),
            button("Save").on_press(Message::Save).padding(10),
        ];

        column![intensity, actions].spacing(12).into()
    }

    /// Action-sheet style list: every filter, then Cancel
    fn filter_chooser(&self) -> Element<'_, Message> {
        let header: Column<Message> = Column::new().spacing(8).push(text("Choose filter").size(20));

        let list = FilterKind::ALL.into_iter().fold(header, |list, kind| {
            list.push(
                button(text(kind.title()))
                    .on_press(Message::FilterChosen(kind))
                    .width(Length::Fill),
            )
        });

        list.push(
            button("Cancel")
                .on_press(Message::CancelFilterChoice)
                .style(button::secondary)
                .width(Length::Fill),
        )
        .into()
    }

    /// Only tick while a fade is running
    fn subscription(&self) -> Subscription<Message> {
        if self.transition.is_animating() {
            iced::time::every(FRAME_INTERVAL).map(Message::Tick)
        } else {
            Subscription::none()
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn notification_view(notification: &Notification) -> Element<'static, Message> {
    let panel = column![
        text(notification.title().to_string()).size(24),
        text(notification.message().to_string()).size(16),
        button("OK")
            .on_press(Message::DismissNotification)
            .padding(10),
    ]
    .spacing(16)
    .padding(40)
    .align_x(Alignment::Center);

    container(panel)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application("Instafilter", Instafilter::update, Instafilter::view)
        .subscription(Instafilter::subscription)
        .theme(Instafilter::theme)
        .centered()
        .run_with(Instafilter::new)
}

/// Save a snapshot into the album on the blocking pool
/// Opens its own catalog connection: rusqlite::Connection is not Send
async fn save_snapshot_async(paths: AlbumPaths, snapshot: Option<Snapshot>) -> Notification {
    let result = tokio::task::spawn_blocking(move || {
        notification::request_save(snapshot.as_ref(), || Album::open(&paths))
    })
    .await;

    result.unwrap_or_else(|e| Notification::SaveFailed(format!("Task join error: {}", e)))
}
