//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC channels, the regulator DAC, GPIO directions and the
//! advance-button interrupt using raw ESP-IDF sys calls. Called once from
//! `main()` before the run starts.
//!
//! On host builds every register access is replaced by an in-memory
//! simulation (see [`sim`]) so drivers above this layer can be tested.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::error::HwError;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    DacInitFailed(i32),
    GpioConfigFailed(i32),
    IsrInstallFailed(i32),
    StorageMountFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc)    => write!(f, "ADC1 init failed (rc={})", rc),
            Self::DacInitFailed(rc)    => write!(f, "DAC init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::StorageMountFailed(rc) => write!(f, "SPIFFS mount failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the run; single-threaded.
    unsafe {
        init_adc()?;
        init_dac()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only after `init_adc()` from the main task.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [pins::SENSOR_A_ADC_CHANNEL, pins::SENSOR_B_ADC_CHANNEL] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::AdcInitFailed(ret)); }
    }

    info!(
        "hw_init: ADC1 configured (CH{}=sensor A, CH{}=sensor B)",
        pins::SENSOR_A_ADC_CHANNEL,
        pins::SENSOR_B_ADC_CHANNEL
    );
    Ok(())
}

/// Raw 12-bit conversion on an ADC1 channel.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, HwError> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract; the run loop is the only caller.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(HwError::AdcReadFailed);
    }
    Ok(raw.clamp(0, i32::from(u16::MAX)) as u16)
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u32) -> Result<u16, HwError> {
    sim::adc_raw(channel)
}

// ── DAC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut DAC0_HANDLE: dac_oneshot_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe fn init_dac() -> Result<(), HwInitError> {
    let cfg = dac_oneshot_config_t {
        chan_id: dac_channel_t_DAC_CHAN_0,
    };
    // SAFETY: DAC0_HANDLE is only written here, once at boot.
    let ret = unsafe { dac_oneshot_new_channel(&cfg, &raw mut DAC0_HANDLE) };
    if ret != ESP_OK as i32 { return Err(HwInitError::DacInitFailed(ret)); }

    let ret = unsafe { dac_oneshot_output_voltage(DAC0_HANDLE, 0) };
    if ret != ESP_OK as i32 { return Err(HwInitError::DacInitFailed(ret)); }

    info!("hw_init: DAC CH0 configured (GPIO{}=regulator)", pins::REGULATOR_DAC_GPIO);
    Ok(())
}

/// Drive the regulator DAC (8-bit).
#[cfg(target_os = "espidf")]
pub fn dac_write(level: u8) -> Result<(), HwError> {
    // SAFETY: DAC0_HANDLE is written once during init_dac(); main task only.
    let ret = unsafe { dac_oneshot_output_voltage(DAC0_HANDLE, level) };
    if ret != ESP_OK as i32 {
        return Err(HwError::DacWriteFailed);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn dac_write(level: u8) -> Result<(), HwError> {
    sim::write_dac(level)
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    let input_pins = [
        pins::INCREMENT_GPIO,
        pins::DECREMENT_GPIO,
        pins::ADVANCE_GPIO,
    ];

    for &pin in &input_pins {
        // GPIO34 has no internal pulls; the panel carries external pull-downs.
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    }

    info!("hw_init: GPIO inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    sim::input(pin)
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [
        pins::VALVE_GPIO,
        pins::READY_LED_GPIO,
        pins::LCD_RS_GPIO,
        pins::LCD_EN_GPIO,
        pins::LCD_D4_GPIO,
        pins::LCD_D5_GPIO,
        pins::LCD_D6_GPIO,
        pins::LCD_D7_GPIO,
    ];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
        unsafe { gpio_set_level(pin as gpio_num_t, 0) };
    }

    info!("hw_init: GPIO outputs configured (valve closed)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), HwError> {
    // SAFETY: gpio_set_level writes to a pin configured in
    // init_gpio_outputs(). Main task only.
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret != ESP_OK as i32 {
        return Err(HwError::GpioWriteFailed);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), HwError> {
    sim::set_output(pin, high);
    Ok(())
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::app::latch::advance_isr_handler;

#[cfg(target_os = "espidf")]
unsafe extern "C" fn advance_gpio_isr(_arg: *mut core::ffi::c_void) {
    advance_isr_handler();
}

/// Install the per-pin GPIO ISR service and hook the advance button.
/// Call after init_peripherals() and before the run starts.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: ESP_ERR_INVALID_STATE means the service is already installed
    // (acceptable). The handler only stores to a lock-free atomic.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK as i32 && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        // Advance button: rising edge (active HIGH with external pull-down)
        gpio_set_intr_type(pins::ADVANCE_GPIO, gpio_int_type_t_GPIO_INTR_POSEDGE);
        let ret = gpio_isr_handler_add(pins::ADVANCE_GPIO, Some(advance_gpio_isr), core::ptr::null_mut());
        if ret != ESP_OK as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        gpio_intr_enable(pins::ADVANCE_GPIO);

        info!("hw_init: ISR service installed (advance)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}

// ── Host simulation ───────────────────────────────────────────

/// In-memory register file standing in for the bench on host builds.
///
/// State is process-global, like the real peripherals; tests that touch it
/// should use pins and channels no other test uses.
#[cfg(not(target_os = "espidf"))]
pub mod sim {
    use core::sync::atomic::{AtomicU16, AtomicU64, AtomicU8, Ordering};

    use crate::error::HwError;

    const ADC_CHANNELS: usize = 10;

    static INPUTS: AtomicU64 = AtomicU64::new(0);
    static OUTPUTS: AtomicU64 = AtomicU64::new(0);
    static ADC_RAW: [AtomicU16; ADC_CHANNELS] = [const { AtomicU16::new(0) }; ADC_CHANNELS];
    static DAC: AtomicU8 = AtomicU8::new(0);

    fn bit(pin: i32) -> u64 {
        1u64 << (pin as u32 & 63)
    }

    pub fn set_input(pin: i32, high: bool) {
        if high {
            INPUTS.fetch_or(bit(pin), Ordering::SeqCst);
        } else {
            INPUTS.fetch_and(!bit(pin), Ordering::SeqCst);
        }
    }

    pub fn input(pin: i32) -> bool {
        INPUTS.load(Ordering::SeqCst) & bit(pin) != 0
    }

    pub fn set_output(pin: i32, high: bool) {
        if high {
            OUTPUTS.fetch_or(bit(pin), Ordering::SeqCst);
        } else {
            OUTPUTS.fetch_and(!bit(pin), Ordering::SeqCst);
        }
    }

    pub fn output(pin: i32) -> bool {
        OUTPUTS.load(Ordering::SeqCst) & bit(pin) != 0
    }

    pub fn set_adc_raw(channel: u32, raw: u16) {
        if let Some(slot) = ADC_RAW.get(channel as usize) {
            slot.store(raw, Ordering::SeqCst);
        }
    }

    pub fn adc_raw(channel: u32) -> Result<u16, HwError> {
        ADC_RAW
            .get(channel as usize)
            .map(|slot| slot.load(Ordering::SeqCst))
            .ok_or(HwError::AdcReadFailed)
    }

    pub fn write_dac(level: u8) -> Result<(), HwError> {
        DAC.store(level, Ordering::SeqCst);
        Ok(())
    }

    pub fn dac_level() -> u8 {
        DAC.load(Ordering::SeqCst)
    }
}
