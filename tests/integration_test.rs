//! End-to-end flows through the screen handlers with fake transports.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use garbot_companion::bluetooth::{MockBluetooth, PairingTransport};
use garbot_companion::config::{Config, MockConfig};
use garbot_companion::control::{mock_system_info, ControlTransport, MockControl};
use garbot_companion::logs::LogLevel;
use garbot_companion::protocol::{
    Command, Device, ScanPoint, SensorData, ServoConfig, SystemInfo,
};
use garbot_companion::screens::{dashboard, log_viewer, scan_area, setup, AppContext};
use garbot_companion::state::{ConnectionStatus, ConnectionType};
use garbot_companion::storage::SessionStorage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/// Radio that finds robots but never manages to pair.
struct RefusingRadio;

#[async_trait]
impl PairingTransport for RefusingRadio {
    async fn request_permissions(&self) -> Result<bool> {
        Ok(true)
    }

    async fn discover(&self) -> Result<Vec<Device>> {
        Ok(vec![Device::new("1", "Garbot_1234")])
    }

    async fn pair(&self, _device_id: &str) -> Result<bool> {
        Err(anyhow!("link lost"))
    }

    async fn unpair(&self, _device_id: &str) -> Result<bool> {
        Ok(true)
    }

    async fn send_credentials(&self, _device_id: &str, _ssid: &str, _password: &str) -> Result<bool> {
        Ok(true)
    }

    async fn send(&self, _device_id: &str, _command: &Command) -> Result<bool> {
        Ok(true)
    }
}

/// Control channel that counts every request it receives.
#[derive(Default)]
struct CountingControl {
    calls: AtomicUsize,
}

impl CountingControl {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ControlTransport for CountingControl {
    async fn get_system_info(&self, _base: &str) -> Result<SystemInfo> {
        self.hit();
        Ok(mock_system_info())
    }

    async fn send_command(&self, _base: &str, _command: &Command) -> Result<bool> {
        self.hit();
        Ok(true)
    }

    async fn test_servo(&self, _base: &str, _config: ServoConfig) -> Result<bool> {
        self.hit();
        Ok(true)
    }

    async fn send_scan_area(&self, _base: &str, _points: &[ScanPoint]) -> Result<bool> {
        self.hit();
        Ok(true)
    }

    async fn read_sensors(&self, _base: &str) -> Result<SensorData> {
        self.hit();
        Err(anyhow!("sensor bus offline"))
    }
}

fn instant_config() -> Config {
    let mut config = Config::default();
    config.mock = MockConfig::instant();
    config
}

fn mock_context(storage: Option<SessionStorage>) -> AppContext {
    AppContext::new(
        Arc::new(MockBluetooth::instant()),
        Arc::new(MockControl::instant()),
        &instant_config(),
        storage,
    )
}

#[tokio::test]
async fn test_scan_returns_three_robots() {
    let ctx = mock_context(None);
    setup::scan(&ctx).await.unwrap();

    let ids: Vec<String> = ctx
        .state
        .get_available_devices()
        .into_iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_failed_pairing_returns_to_disconnected() {
    let ctx = AppContext::new(
        Arc::new(RefusingRadio),
        Arc::new(MockControl::instant()),
        &instant_config(),
        None,
    );

    setup::scan(&ctx).await.unwrap();
    let alert = setup::connect(&ctx, "1").await.unwrap_err();

    assert!(alert.is_error());
    assert_eq!(ctx.state.get_status(), ConnectionStatus::Disconnected);
    assert!(ctx.state.get_current_device().is_none());
    let last = ctx.logs.last().unwrap();
    assert_eq!(last.level, LogLevel::Error);
    assert!(last.message.starts_with("Connection error"));
}

#[tokio::test]
async fn test_disconnect_without_device_is_noop() {
    let ctx = mock_context(None);
    assert_eq!(setup::disconnect(&ctx).await.unwrap(), None);
    assert!(ctx.logs.is_empty());
}

#[tokio::test]
async fn test_wifi_requires_bluetooth_session() {
    let ctx = mock_context(None);

    // Not connected at all.
    assert!(setup::setup_wifi(&ctx, "Garden", "pw").await.is_err());
    assert!(ctx.control.base_url().is_none());

    setup::scan(&ctx).await.unwrap();
    setup::connect(&ctx, "2").await.unwrap();
    setup::setup_wifi(&ctx, "Garden", "pw").await.unwrap();
    assert_eq!(ctx.state.get_connection_type(), Some(ConnectionType::Wifi));
    assert_eq!(ctx.state.get_system_info(), Some(mock_system_info()));

    // Already on WiFi.
    assert!(setup::setup_wifi(&ctx, "Garden", "pw").await.is_err());
    assert_eq!(ctx.state.status_text(), "WiFi Connected");
}

#[tokio::test]
async fn test_small_scan_area_never_reaches_robot() {
    let control = Arc::new(CountingControl::default());
    let ctx = AppContext::new(
        Arc::new(MockBluetooth::instant()),
        control.clone(),
        &instant_config(),
        None,
    );
    setup::scan(&ctx).await.unwrap();
    setup::connect(&ctx, "1").await.unwrap();
    setup::setup_wifi(&ctx, "Garden", "").await.unwrap();
    let after_setup = control.calls();

    scan_area::add_point(&ctx, 0.2, 0.2, 1.0).unwrap();
    scan_area::add_point(&ctx, 0.8, 0.2, 1.0).unwrap();
    assert!(scan_area::send(&ctx).await.is_err());
    assert_eq!(control.calls(), after_setup);

    scan_area::add_point(&ctx, 0.5, 0.8, 1.0).unwrap();
    scan_area::send(&ctx).await.unwrap();
    assert_eq!(control.calls(), after_setup + 1);
}

#[tokio::test]
async fn test_fetch_errors_become_alerts() {
    let control = Arc::new(CountingControl::default());
    let ctx = AppContext::new(
        Arc::new(MockBluetooth::instant()),
        control.clone(),
        &instant_config(),
        None,
    );
    setup::scan(&ctx).await.unwrap();
    setup::connect(&ctx, "1").await.unwrap();

    dashboard::fetch_system_info(&ctx).await.unwrap();
    assert_eq!(ctx.state.get_system_info(), Some(mock_system_info()));

    let alert = garbot_companion::screens::robot::refresh_sensors(&ctx)
        .await
        .unwrap_err();
    assert!(alert.is_error());
    assert!(ctx.state.get_sensor_data().is_none());
    assert_eq!(control.calls(), 2);
}

#[tokio::test]
async fn test_clear_logs() {
    let ctx = mock_context(None);
    setup::scan(&ctx).await.unwrap();
    assert!(!ctx.logs.is_empty());

    log_viewer::clear(&ctx).unwrap();
    assert!(ctx.logs.is_empty());
    assert_eq!(log_viewer::render(&ctx), vec!["No logs available".to_string()]);
}

#[tokio::test]
async fn test_session_survives_restart() {
    let dir = tempdir().unwrap();

    {
        let ctx = mock_context(Some(SessionStorage::new(dir.path()).unwrap()));
        setup::scan(&ctx).await.unwrap();
        setup::connect(&ctx, "3").await.unwrap();
        setup::setup_wifi(&ctx, "Garden", "pw").await.unwrap();
    }

    let ctx = mock_context(Some(SessionStorage::new(dir.path()).unwrap()));
    setup::restore_session(&ctx, false).await.unwrap();
    assert_eq!(ctx.state.get_status(), ConnectionStatus::Disconnected);
    assert!(ctx.state.get_current_device().is_none());
    assert_eq!(ctx.state.get_system_info(), Some(mock_system_info()));

    let remembered = ctx.restore().unwrap();
    assert_eq!(remembered.name, "Garbot_9ABC");
    assert!(!remembered.connected);

    let ctx = mock_context(Some(SessionStorage::new(dir.path()).unwrap()));
    setup::restore_session(&ctx, true).await.unwrap();
    assert_eq!(ctx.state.get_status(), ConnectionStatus::Connected);
    assert_eq!(ctx.state.get_connection_type(), Some(ConnectionType::Bluetooth));
}
