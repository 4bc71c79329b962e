use std::ffi::OsStr;
use std::sync::Arc;

use libloading::Library;
use tracing::{debug, info};

use super::ffi::{self, libsecam_t, CloseFn, FilterToBufferFn, InitFn, OptionsFn};
use super::{frame_len, SecamBackend};
use crate::{
    error::{BackendError, FrameError, Result},
    intensity::SecamOptions,
};

/// Resolved libsecam entry points
///
/// When loaded at runtime the library handle is kept alongside the function
/// pointers so they stay valid for as long as this value lives.
#[derive(Debug)]
pub struct Libsecam {
    init: InitFn,
    options: OptionsFn,
    filter_to_buffer: FilterToBufferFn,
    close: CloseFn,
    _library: Option<Library>,
}

impl Libsecam {
    /// Load libsecam from a shared library path
    pub fn load<P: AsRef<OsStr>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let shown = path.to_string_lossy().into_owned();

        // SAFETY: loading runs the library's initializers; libsecam has none
        // beyond the C runtime's.
        let library = unsafe { Library::new(path) }.map_err(|source| BackendError::LoadFailed {
            path: shown.clone(),
            source,
        })?;

        // SAFETY: the signatures in `ffi` mirror libsecam.h.
        let (init, options, filter_to_buffer, close) = unsafe {
            (
                symbol::<InitFn>(&library, ffi::INIT_SYMBOL, "libsecam_init")?,
                symbol::<OptionsFn>(&library, ffi::OPTIONS_SYMBOL, "libsecam_options")?,
                symbol::<FilterToBufferFn>(
                    &library,
                    ffi::FILTER_TO_BUFFER_SYMBOL,
                    "libsecam_filter_to_buffer",
                )?,
                symbol::<CloseFn>(&library, ffi::CLOSE_SYMBOL, "libsecam_close")?,
            )
        };

        info!("Loaded libsecam from {}", shown);

        Ok(Self {
            init,
            options,
            filter_to_buffer,
            close,
            _library: Some(library),
        })
    }

    /// Load libsecam by its platform library name from the loader search path
    pub fn load_default() -> Result<Self> {
        Self::load(libloading::library_filename("secam"))
    }

    /// Use the copy of libsecam linked into this binary
    #[cfg(feature = "linked")]
    pub fn linked() -> Self {
        Self {
            init: ffi::libsecam_init,
            options: ffi::libsecam_options,
            filter_to_buffer: ffi::libsecam_filter_to_buffer,
            close: ffi::libsecam_close,
            _library: None,
        }
    }

    /// Create a filter context for frames of the given size
    pub fn open(self: &Arc<Self>, width: u32, height: u32) -> Result<LibsecamHandle> {
        if width == 0 || height == 0 {
            return Err(FrameError::InvalidDimensions { width, height }.into());
        }

        // SAFETY: init has no preconditions beyond the dimensions checked above.
        let ctx = unsafe { (self.init)(width, height) };
        if ctx.is_null() {
            return Err(BackendError::InitFailed { width, height }.into());
        }

        debug!("Opened libsecam context {:p} for {}x{}", ctx, width, height);

        Ok(LibsecamHandle {
            library: Arc::clone(self),
            ctx,
            width,
            height,
        })
    }
}

unsafe fn symbol<T: Copy>(library: &Library, name: &[u8], symbol_name: &'static str) -> Result<T> {
    let symbol = library
        .get::<T>(name)
        .map_err(|source| BackendError::MissingSymbol { symbol: symbol_name, source })?;
    Ok(*symbol)
}

/// An open libsecam context
///
/// Closed exactly once, when dropped.
#[derive(Debug)]
pub struct LibsecamHandle {
    library: Arc<Libsecam>,
    ctx: *mut libsecam_t,
    width: u32,
    height: u32,
}

impl LibsecamHandle {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl SecamBackend for LibsecamHandle {
    fn configure(&mut self, options: &SecamOptions) -> Result<()> {
        // SAFETY: ctx is a live context owned by this handle.
        let block = unsafe { (self.library.options)(self.ctx) };

        // SAFETY: a non-null block points into the context and is only
        // touched by libsecam during filter calls, which need &mut self.
        match unsafe { block.as_mut() } {
            Some(block) => {
                block.assign(options);
                Ok(())
            }
            None => Err(BackendError::OptionsUnavailable.into()),
        }
    }

    fn filter_to_buffer(&mut self, input: &[u8], output: &mut [u8]) -> Result<()> {
        let expected = frame_len(self.width, self.height);
        for actual in [input.len(), output.len()] {
            if actual != expected {
                return Err(FrameError::SizeMismatch { expected, actual }.into());
            }
        }

        // SAFETY: both buffers hold a full frame for the size this context
        // was opened with, and they cannot alias (shared vs exclusive borrow).
        unsafe {
            (self.library.filter_to_buffer)(self.ctx, input.as_ptr(), output.as_mut_ptr());
        }
        Ok(())
    }
}

impl Drop for LibsecamHandle {
    fn drop(&mut self) {
        debug!("Closing libsecam context {:p}", self.ctx);
        // SAFETY: ctx came from init and is never used after this point.
        unsafe { (self.library.close)(self.ctx) };
    }
}

/// In-process stand-in for libsecam, wired up through the same entry points
#[cfg(test)]
pub(crate) mod fake {
    use std::os::raw::{c_uchar, c_uint};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::backend::ffi::libsecam_options_t;

    /// A fake context; never freed, so counters stay readable after close
    pub(crate) struct FakeContext {
        pub options: libsecam_options_t,
        pub width: c_uint,
        pub height: c_uint,
        pub filtered: AtomicUsize,
        pub closed: AtomicUsize,
    }

    unsafe extern "C" fn init(width: c_uint, height: c_uint) -> *mut libsecam_t {
        let ctx = Box::new(FakeContext {
            options: libsecam_options_t::default(),
            width,
            height,
            filtered: AtomicUsize::new(0),
            closed: AtomicUsize::new(0),
        });
        Box::into_raw(ctx).cast()
    }

    unsafe extern "C" fn init_null(_width: c_uint, _height: c_uint) -> *mut libsecam_t {
        std::ptr::null_mut()
    }

    unsafe extern "C" fn options(ctx: *mut libsecam_t) -> *mut libsecam_options_t {
        std::ptr::addr_of_mut!((*ctx.cast::<FakeContext>()).options)
    }

    unsafe extern "C" fn options_null(_ctx: *mut libsecam_t) -> *mut libsecam_options_t {
        std::ptr::null_mut()
    }

    // Inverts every byte
    unsafe extern "C" fn filter_to_buffer(ctx: *mut libsecam_t, src: *const c_uchar, dst: *mut c_uchar) {
        let ctx = &*ctx.cast::<FakeContext>();
        let len = ctx.width as usize * ctx.height as usize * 4;
        for i in 0..len {
            *dst.add(i) = 255 - *src.add(i);
        }
        ctx.filtered.fetch_add(1, Ordering::SeqCst);
    }

    unsafe extern "C" fn close(ctx: *mut libsecam_t) {
        (*ctx.cast::<FakeContext>()).closed.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn library() -> Libsecam {
        Libsecam {
            init,
            options,
            filter_to_buffer,
            close,
            _library: None,
        }
    }

    pub(crate) fn library_failing_init() -> Libsecam {
        Libsecam { init: init_null, ..library() }
    }

    pub(crate) fn library_without_options() -> Libsecam {
        Libsecam { options: options_null, ..library() }
    }

    /// The fake context behind an open handle
    pub(crate) fn context(handle: &LibsecamHandle) -> &'static FakeContext {
        unsafe { &*handle.ctx.cast::<FakeContext>() }
    }

    pub(crate) fn closed(ctx: &FakeContext) -> usize {
        ctx.closed.load(Ordering::SeqCst)
    }

    pub(crate) fn filtered(ctx: &FakeContext) -> usize {
        ctx.filtered.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Secamiz0rError;

    #[test]
    fn test_load_missing_library() {
        let err = Libsecam::load("/nonexistent/libsecam-missing.so").unwrap_err();
        match err {
            Secamiz0rError::Backend(BackendError::LoadFailed { path, .. }) => {
                assert_eq!(path, "/nonexistent/libsecam-missing.so");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_open_passes_dimensions_and_drop_closes_once() {
        let library = Arc::new(fake::library());
        let handle = library.open(16, 8).unwrap();
        let ctx = fake::context(&handle);

        assert_eq!((ctx.width, ctx.height), (16, 8));
        assert_eq!((handle.width(), handle.height()), (16, 8));
        assert_eq!(fake::closed(ctx), 0);

        drop(handle);
        assert_eq!(fake::closed(ctx), 1);
    }

    #[test]
    fn test_null_context_is_init_failure() {
        let library = Arc::new(fake::library_failing_init());
        let err = library.open(64, 48).unwrap_err();
        assert!(matches!(
            err,
            Secamiz0rError::Backend(BackendError::InitFailed { width: 64, height: 48 })
        ));
    }

    #[test]
    fn test_zero_dimensions_rejected_before_init() {
        let library = Arc::new(fake::library_failing_init());
        let err = library.open(0, 48).unwrap_err();
        assert!(matches!(err, Secamiz0rError::Frame(FrameError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_configure_writes_option_block() {
        let library = Arc::new(fake::library());
        let mut handle = library.open(8, 8).unwrap();

        handle.configure(&SecamOptions::from_intensity(1.0)).unwrap();

        let options = &fake::context(&handle).options;
        assert_eq!(options.luma_noise_factor, SecamOptions::maximum().luma_noise_factor);
        assert_eq!(options.chroma_fire_factor, SecamOptions::maximum().chroma_fire_factor);
        assert_eq!(options.echo_offset, 20);
        assert_eq!(options.horizontal_instability, 32);
    }

    #[test]
    fn test_missing_option_block() {
        let library = Arc::new(fake::library_without_options());
        let mut handle = library.open(8, 8).unwrap();

        let err = handle.configure(&SecamOptions::default()).unwrap_err();
        assert!(matches!(err, Secamiz0rError::Backend(BackendError::OptionsUnavailable)));
    }

    #[test]
    fn test_filter_checks_buffer_sizes() {
        let library = Arc::new(fake::library());
        let mut handle = library.open(4, 2).unwrap();
        let ctx = fake::context(&handle);

        let mut output = vec![0u8; 32];
        let err = handle.filter_to_buffer(&[0u8; 31], &mut output).unwrap_err();
        assert!(matches!(
            err,
            Secamiz0rError::Frame(FrameError::SizeMismatch { expected: 32, actual: 31 })
        ));

        let mut short_output = vec![0u8; 30];
        assert!(handle.filter_to_buffer(&[0u8; 32], &mut short_output).is_err());
        assert_eq!(fake::filtered(ctx), 0);

        handle.filter_to_buffer(&[5u8; 32], &mut output).unwrap();
        assert!(output.iter().all(|&b| b == 250));
        assert_eq!(fake::filtered(ctx), 1);
    }
}
