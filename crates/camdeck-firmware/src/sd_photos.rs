//! Photo store on an SD card wired for SD-MMC 1-bit mode.

use core::ptr;
use std::ffi::CString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use esp_idf_svc::sys;

use camdeck_ui::{Frame, PhotoInfo, PhotoStore, StorageError};

use crate::config::sd;
use crate::jpeg;

pub struct SdPhotoStore {
    mounted: bool,
    card: *mut sys::sdmmc_card_t,
    /// Why the card is missing, for the diagnostics report.
    failure: Option<String>,
}

impl SdPhotoStore {
    pub fn mount() -> Result<Self, StorageError> {
        let c_base = CString::new(sd::MOUNT_POINT)
            .map_err(|_| StorageError::IoError("Invalid mount path".into()))?;

        let host = build_sdmmc_host();
        let slot_config = build_slot_config();
        let mount_config = sys::esp_vfs_fat_mount_config_t {
            format_if_mount_failed: false,
            max_files: sd::MAX_OPEN_FILES,
            allocation_unit_size: 16 * 1024,
            disk_status_check_enable: false,
            use_one_fat: false,
        };

        let mut card: *mut sys::sdmmc_card_t = ptr::null_mut();
        let res = unsafe {
            sys::esp_vfs_fat_sdmmc_mount(
                c_base.as_ptr(),
                &host,
                &slot_config as *const sys::sdmmc_slot_config_t as *const core::ffi::c_void,
                &mount_config,
                &mut card,
            )
        };
        if res != sys::ESP_OK {
            return Err(StorageError::IoError(format!("SD mount failed: {}", res)));
        }
        log::info!("SD card mounted at {}", sd::MOUNT_POINT);

        fs::create_dir_all(sd::PHOTO_DIR).map_err(io_error)?;
        Ok(Self {
            mounted: true,
            card,
            failure: None,
        })
    }

    /// Stand-in used when the card is absent so boot can continue.
    pub fn unavailable(reason: String) -> Self {
        Self {
            mounted: false,
            card: ptr::null_mut(),
            failure: Some(reason),
        }
    }

    fn photo_path(name: &str) -> PathBuf {
        Path::new(sd::PHOTO_DIR).join(name)
    }

    fn next_name(&self) -> Result<String, StorageError> {
        let highest = fs::read_dir(sd::PHOTO_DIR)
            .map_err(io_error)?
            .flatten()
            .filter_map(|entry| photo_number(&entry.file_name().to_string_lossy()))
            .max()
            .unwrap_or(0);
        Ok(format!("IMG_{:04}.jpg", highest + 1))
    }
}

/// `IMG_0042.jpg` -> 42
fn photo_number(name: &str) -> Option<u32> {
    name.strip_prefix("IMG_")?
        .strip_suffix(".jpg")?
        .parse()
        .ok()
}

fn is_jpeg(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".jpg") || lower.ends_with(".jpeg")
}

fn io_error(err: std::io::Error) -> StorageError {
    match err.kind() {
        ErrorKind::NotFound => StorageError::NotFound,
        _ => StorageError::IoError(format!("{:?}", err)),
    }
}

impl PhotoStore for SdPhotoStore {
    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn list(&mut self, limit: usize) -> Result<Vec<PhotoInfo>, StorageError> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }
        let mut photos = Vec::new();
        for entry in fs::read_dir(sd::PHOTO_DIR).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let name = entry.file_name().to_string_lossy().to_string();
            let meta = entry.metadata().map_err(io_error)?;
            if meta.is_file() && is_jpeg(&name) {
                photos.push(PhotoInfo {
                    name,
                    size: meta.len(),
                });
            }
        }
        photos.sort_by(|a, b| a.name.cmp(&b.name));
        photos.truncate(limit);
        Ok(photos)
    }

    fn save(&mut self, frame: &Frame) -> Result<String, StorageError> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }
        if frame.encoded.is_empty() {
            return Err(StorageError::IoError("Frame has no JPEG data".into()));
        }
        let name = self.next_name()?;
        fs::write(Self::photo_path(&name), &frame.encoded).map_err(io_error)?;
        Ok(name)
    }

    fn load(&mut self, name: &str) -> Result<Frame, StorageError> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }
        let bytes = fs::read(Self::photo_path(name)).map_err(io_error)?;
        jpeg::decode_for_display(bytes).map_err(|err| StorageError::Decode(err.to_string()))
    }

    fn delete(&mut self, name: &str) -> Result<(), StorageError> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }
        fs::remove_file(Self::photo_path(name)).map_err(io_error)
    }

    fn log_status(&mut self) {
        if !self.mounted {
            log::info!(
                "SD card not mounted ({})",
                self.failure.as_deref().unwrap_or("unknown reason")
            );
            log::info!(
                "SD pins: CMD=IO{} CLK=IO{} D0=IO{}",
                sd::CMD,
                sd::CLK,
                sd::D0
            );
            return;
        }

        let capacity_mb = unsafe { self.card.as_ref() }
            .map(|card| card.csd.capacity as u64 * card.csd.sector_size as u64 / (1024 * 1024));
        let mut total: u64 = 0;
        let mut free: u64 = 0;
        let info = CString::new(sd::MOUNT_POINT)
            .ok()
            .map(|base| unsafe { sys::esp_vfs_fat_info(base.as_ptr(), &mut total, &mut free) });
        let photo_count = self.list(usize::MAX).map(|photos| photos.len());

        log::info!("SD card mounted at {}", sd::MOUNT_POINT);
        if let Some(capacity_mb) = capacity_mb {
            log::info!("Card size: {}MB", capacity_mb);
        }
        if info == Some(sys::ESP_OK) {
            log::info!(
                "Total: {}MB, Free: {}MB",
                total / (1024 * 1024),
                free / (1024 * 1024)
            );
        }
        match photo_count {
            Ok(count) => log::info!("Photos found: {}", count),
            Err(err) => log::warn!("Photo directory unreadable: {}", err),
        }
    }
}

fn build_sdmmc_host() -> sys::sdmmc_host_t {
    const SDMMC_HOST_FLAG_1BIT: u32 = 1 << 0;
    const SDMMC_HOST_FLAG_4BIT: u32 = 1 << 1;
    const SDMMC_HOST_FLAG_8BIT: u32 = 1 << 2;
    const SDMMC_HOST_FLAG_DDR: u32 = 1 << 4;
    const SDMMC_HOST_SLOT_1: i32 = 1;
    const SDMMC_FREQ_DEFAULT_KHZ: i32 = 20_000;

    sys::sdmmc_host_t {
        flags: SDMMC_HOST_FLAG_8BIT
            | SDMMC_HOST_FLAG_4BIT
            | SDMMC_HOST_FLAG_1BIT
            | SDMMC_HOST_FLAG_DDR,
        slot: SDMMC_HOST_SLOT_1 as _,
        max_freq_khz: SDMMC_FREQ_DEFAULT_KHZ as _,
        io_voltage: 3.3,
        init: Some(sys::sdmmc_host_init),
        set_bus_width: Some(sys::sdmmc_host_set_bus_width),
        get_bus_width: Some(sys::sdmmc_host_get_slot_width),
        set_bus_ddr_mode: Some(sys::sdmmc_host_set_bus_ddr_mode),
        set_card_clk: Some(sys::sdmmc_host_set_card_clk),
        set_cclk_always_on: Some(sys::sdmmc_host_set_cclk_always_on),
        do_transaction: Some(sys::sdmmc_host_do_transaction),
        __bindgen_anon_1: sys::sdmmc_host_t__bindgen_ty_1 {
            deinit: Some(sys::sdmmc_host_deinit),
        },
        io_int_enable: Some(sys::sdmmc_host_io_int_enable),
        io_int_wait: Some(sys::sdmmc_host_io_int_wait),
        command_timeout_ms: 0,
        get_real_freq: Some(sys::sdmmc_host_get_real_freq),
        input_delay_phase: sys::sdmmc_delay_phase_t_SDMMC_DELAY_PHASE_0,
        set_input_delay: Some(sys::sdmmc_host_set_input_delay),
        dma_aligned_buffer: ptr::null_mut(),
        pwr_ctrl_handle: ptr::null_mut(),
        get_dma_info: Some(sys::sdmmc_host_get_dma_info),
    }
}

fn build_slot_config() -> sys::sdmmc_slot_config_t {
    const SDMMC_SLOT_FLAG_INTERNAL_PULLUP: u32 = 1 << 0;
    const NC: i32 = -1;

    sys::sdmmc_slot_config_t {
        clk: sd::CLK,
        cmd: sd::CMD,
        d0: sd::D0,
        d1: NC,
        d2: NC,
        d3: NC,
        d4: NC,
        d5: NC,
        d6: NC,
        d7: NC,
        __bindgen_anon_1: sys::sdmmc_slot_config_t__bindgen_ty_1 { gpio_cd: NC },
        __bindgen_anon_2: sys::sdmmc_slot_config_t__bindgen_ty_2 { gpio_wp: NC },
        width: 1,
        flags: SDMMC_SLOT_FLAG_INTERNAL_PULLUP as _,
    }
}
