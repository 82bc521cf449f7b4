use crate::errors::*;

use zbus::blocking::Connection;

make_log_macro!(debug, "logind");

#[zbus::dbus_proxy(
    interface = "org.freedesktop.login1.Session",
    default_service = "org.freedesktop.login1",
    default_path = "/org/freedesktop/login1/session/auto"
)]
trait Session {
    fn set_brightness(&self, subsystem: &str, name: &str, brightness: u32) -> zbus::Result<()>;
}

/// Have logind write `brightness` to the device `name` of `subsystem`.
pub(crate) fn set_brightness(subsystem: &str, name: &str, brightness: u32) -> Result<()> {
    let connection = Connection::system()?;
    let proxy = SessionProxyBlocking::new(&connection)?;
    proxy.set_brightness(subsystem, name, brightness)?;
    debug!("{subsystem}/{name} = {brightness}");
    Ok(())
}
