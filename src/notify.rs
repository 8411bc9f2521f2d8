//! Track-change sinks and the freedesktop notification client.

use std::collections::HashMap;

use tracing::debug;
use zvariant::Value;

use crate::catalog::Station;
use crate::config::NotificationSettings;
use crate::display;
use crate::metadata::TrackInfo;

/// Told once whenever the displayed title changes. Best-effort: never fails back.
pub trait TrackSink {
    fn track_changed(&mut self, station: Station, track: &TrackInfo);
}

#[zbus::proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    #[allow(clippy::too_many_arguments)]
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: HashMap<&str, &Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

/// Desktop notifications on the session bus. Each new one replaces the previous.
pub struct DesktopNotifier {
    proxy: NotificationsProxyBlocking<'static>,
    settings: NotificationSettings,
    last_id: u32,
}

impl DesktopNotifier {
    pub fn connect(settings: NotificationSettings) -> zbus::Result<Self> {
        let connection = zbus::blocking::Connection::session()?;
        let proxy = NotificationsProxyBlocking::new(&connection)?;
        Ok(Self {
            proxy,
            settings,
            last_id: 0,
        })
    }

    /// Fire-and-forget `notify(title, subtitle, icon)`.
    pub fn notify(&mut self, summary: &str, body: &str) {
        match self.proxy.notify(
            &self.settings.app_name,
            self.last_id,
            &self.settings.icon,
            summary,
            body,
            &[],
            HashMap::new(),
            -1,
        ) {
            Ok(id) => self.last_id = id,
            Err(e) => debug!(error = %e, "desktop notification failed"),
        }
    }
}

impl TrackSink for DesktopNotifier {
    fn track_changed(&mut self, station: Station, track: &TrackInfo) {
        let n = display::notification(station, track);
        self.notify(&n.summary, &n.body);
    }
}
