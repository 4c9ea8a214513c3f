//! OV2640 through the esp32-camera component, QVGA JPEG frames.

use core::ffi::c_int;

use esp_idf_svc::sys::{self, camera as cam};

use camdeck_ui::{Camera, CameraError, Frame};

use crate::config::camera as pins;
use crate::jpeg;

type SensorSetter = Option<unsafe extern "C" fn(*mut cam::sensor_t, c_int) -> c_int>;

pub struct EspCamera {
    available: bool,
}

impl EspCamera {
    pub fn init() -> Result<Self, CameraError> {
        let psram = unsafe { sys::heap_caps_get_total_size(sys::MALLOC_CAP_SPIRAM) } > 0;
        let config = cam::camera_config_t {
            pin_pwdn: pins::PWDN,
            pin_reset: pins::RESET,
            pin_xclk: pins::XCLK,
            __bindgen_anon_1: cam::camera_config_t__bindgen_ty_1 {
                pin_sccb_sda: pins::SIOD,
            },
            __bindgen_anon_2: cam::camera_config_t__bindgen_ty_2 {
                pin_sccb_scl: pins::SIOC,
            },
            pin_d7: pins::Y9,
            pin_d6: pins::Y8,
            pin_d5: pins::Y7,
            pin_d4: pins::Y6,
            pin_d3: pins::Y5,
            pin_d2: pins::Y4,
            pin_d1: pins::Y3,
            pin_d0: pins::Y2,
            pin_vsync: pins::VSYNC,
            pin_href: pins::HREF,
            pin_pclk: pins::PCLK,
            xclk_freq_hz: pins::XCLK_HZ,
            ledc_timer: cam::ledc_timer_t_LEDC_TIMER_0,
            ledc_channel: cam::ledc_channel_t_LEDC_CHANNEL_0,
            pixel_format: cam::pixformat_t_PIXFORMAT_JPEG,
            frame_size: cam::framesize_t_FRAMESIZE_QVGA,
            jpeg_quality: pins::JPEG_QUALITY,
            fb_count: if psram { 2 } else { 1 },
            fb_location: if psram {
                cam::camera_fb_location_t_CAMERA_FB_IN_PSRAM
            } else {
                cam::camera_fb_location_t_CAMERA_FB_IN_DRAM
            },
            grab_mode: cam::camera_grab_mode_t_CAMERA_GRAB_WHEN_EMPTY,
            sccb_i2c_port: -1,
        };

        let err = unsafe { cam::esp_camera_init(&config) };
        if err != sys::ESP_OK {
            return Err(CameraError::CaptureFailed(format!(
                "Camera init failed: 0x{:x}",
                err
            )));
        }
        tune_sensor();
        log::info!("Camera ready: QVGA JPEG, {} frame buffer(s)", config.fb_count);
        Ok(Self { available: true })
    }

    /// Stand-in used when the sensor does not answer so boot can continue.
    pub fn unavailable() -> Self {
        Self { available: false }
    }

    /// Copies one JPEG frame out of the driver and hands the buffer back.
    fn grab_jpeg(&mut self) -> Result<Vec<u8>, CameraError> {
        if !self.available {
            return Err(CameraError::Unavailable);
        }
        let fb = unsafe { cam::esp_camera_fb_get() };
        if fb.is_null() {
            return Err(CameraError::CaptureFailed("no frame from sensor".into()));
        }
        let bytes = unsafe {
            let fb_ref = &*fb;
            let bytes = core::slice::from_raw_parts(fb_ref.buf, fb_ref.len as usize).to_vec();
            cam::esp_camera_fb_return(fb);
            bytes
        };
        Ok(bytes)
    }

    fn grab_frame(&mut self) -> Result<Frame, CameraError> {
        let jpeg = self.grab_jpeg()?;
        jpeg::decode_for_display(jpeg).map_err(|err| CameraError::CaptureFailed(err.to_string()))
    }
}

/// Brightness-biased sensor settings for indoor use.
fn tune_sensor() {
    let sensor = unsafe { cam::esp_camera_sensor_get() };
    let Some(s) = (unsafe { sensor.as_ref() }) else {
        log::warn!("Camera sensor handle unavailable, using defaults");
        return;
    };

    let settings: [(&str, SensorSetter, c_int); 19] = [
        ("hmirror", s.set_hmirror, 1),
        ("vflip", s.set_vflip, 0),
        ("quality", s.set_quality, pins::JPEG_QUALITY),
        ("brightness", s.set_brightness, 2),
        ("contrast", s.set_contrast, 2),
        ("saturation", s.set_saturation, 1),
        ("exposure_ctrl", s.set_exposure_ctrl, 1),
        ("gain_ctrl", s.set_gain_ctrl, 1),
        ("awb_gain", s.set_awb_gain, 1),
        ("wb_mode", s.set_wb_mode, 0),
        ("aec2", s.set_aec2, 1),
        ("ae_level", s.set_ae_level, 2),
        ("agc_gain", s.set_agc_gain, 20),
        ("aec_value", s.set_aec_value, 800),
        ("lenc", s.set_lenc, 1),
        ("bpc", s.set_bpc, 1),
        ("wpc", s.set_wpc, 1),
        ("dcw", s.set_dcw, 1),
        ("raw_gma", s.set_raw_gma, 1),
    ];
    for (name, setter, value) in settings {
        let Some(set) = setter else {
            continue;
        };
        if unsafe { set(sensor, value) } != 0 {
            log::warn!("Camera: {} = {} rejected", name, value);
        }
    }
}

impl Camera for EspCamera {
    fn is_available(&self) -> bool {
        self.available
    }

    fn preview(&mut self) -> Result<Frame, CameraError> {
        self.grab_frame()
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let frame = self.grab_frame()?;
        log::info!(
            "Captured {}x{} preview, {} JPEG bytes",
            frame.width,
            frame.height,
            frame.encoded.len()
        );
        Ok(frame)
    }
}
