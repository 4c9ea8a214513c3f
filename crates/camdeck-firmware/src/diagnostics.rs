use esp_idf_svc::sys;

/// Log heap usage, PSRAM headroom and current task stack headroom.
pub fn log_heap(label: &str) {
    let free_heap = unsafe { sys::esp_get_free_heap_size() };
    let min_free = unsafe { sys::esp_get_minimum_free_heap_size() };
    let largest_8bit = unsafe { sys::heap_caps_get_largest_free_block(sys::MALLOC_CAP_8BIT) };
    let free_psram = unsafe { sys::heap_caps_get_free_size(sys::MALLOC_CAP_SPIRAM) };
    let stack_hwm_words = unsafe { sys::uxTaskGetStackHighWaterMark(core::ptr::null_mut()) };
    let stack_hwm_bytes = (stack_hwm_words as usize) * core::mem::size_of::<sys::StackType_t>();
    log::info!(
        "[MEM] {}: free={} min_free={} largest_8bit={} psram={} stack_hwm={}B",
        label,
        free_heap,
        min_free,
        largest_8bit,
        free_psram,
        stack_hwm_bytes
    );
}

/// Milliseconds since boot.
pub fn uptime_ms() -> u64 {
    let micros = unsafe { sys::esp_timer_get_time() };
    (micros / 1_000) as u64
}
