use core::convert::TryInto;

use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use crate::config::wifi as settings;

/// Station-mode Wi-Fi, brought up on first use.
pub struct WifiLink {
    wifi: BlockingWifi<EspWifi<'static>>,
    started: bool,
}

impl WifiLink {
    pub fn new(modem: Modem, sys_loop: EspSystemEventLoop) -> anyhow::Result<Self> {
        let nvs = EspDefaultNvsPartition::take().ok();
        let esp_wifi = EspWifi::new(modem, sys_loop.clone(), nvs)?;
        let wifi = BlockingWifi::wrap(esp_wifi, sys_loop)?;
        Ok(Self {
            wifi,
            started: false,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    /// Associates with the configured network, polling the link every
    /// [`settings::ATTEMPT_INTERVAL_MS`] for up to
    /// [`settings::CONNECT_ATTEMPTS`] attempts, then waits for an IP.
    pub fn connect(&mut self) -> Result<(), String> {
        if self.is_connected() {
            return Ok(());
        }
        if settings::SSID.is_empty() {
            return Err(String::from("Wi-Fi SSID not configured"));
        }
        if !self.started {
            self.configure()?;
        }

        log::info!("Connecting to Wi-Fi '{}'...", settings::SSID);
        self.wifi
            .wifi_mut()
            .connect()
            .map_err(|err| format!("wifi sta connect failed: {}", err))?;

        let mut attempts = 0;
        while !self.is_connected() && attempts < settings::CONNECT_ATTEMPTS {
            FreeRtos::delay_ms(settings::ATTEMPT_INTERVAL_MS);
            attempts += 1;
            if attempts % 4 == 0 {
                log::info!("Wi-Fi attempt {}/{}", attempts, settings::CONNECT_ATTEMPTS);
            }
        }
        if !self.is_connected() {
            let _ = self.wifi.wifi_mut().disconnect();
            return Err(format!("not connected after {} attempts", attempts));
        }

        self.wifi
            .wait_netif_up()
            .map_err(|err| format!("wifi sta netif up failed: {}", err))?;
        match self.wifi.wifi().sta_netif().get_ip_info() {
            Ok(info) => log::info!("Wi-Fi connected, IP {}", info.ip),
            Err(err) => log::warn!("Wi-Fi connected, IP unknown: {}", err),
        }
        Ok(())
    }

    fn configure(&mut self) -> Result<(), String> {
        let ssid = settings::SSID
            .try_into()
            .map_err(|_| String::from("SSID too long (max 32)"))?;
        let (auth_method, password) = if settings::PASSWORD.is_empty() {
            (AuthMethod::None, Default::default())
        } else {
            (
                AuthMethod::WPA2Personal,
                settings::PASSWORD
                    .try_into()
                    .map_err(|_| String::from("password too long (max 64)"))?,
            )
        };

        let conf = Configuration::Client(ClientConfiguration {
            ssid,
            bssid: None,
            auth_method,
            password,
            channel: None,
            ..Default::default()
        });
        self.wifi
            .set_configuration(&conf)
            .map_err(|err| format!("wifi sta config failed: {}", err))?;
        self.wifi
            .start()
            .map_err(|err| format!("wifi sta start failed: {}", err))?;
        self.started = true;
        Ok(())
    }
}
