//! An image plus its pixels, with pixel work for large images moved to a
//! worker thread.
//!
//! Commands are strictly sequenced: [`ImageSession::run`] waits for the
//! previous job's completion message before dispatching. Geometry is
//! committed under the state write lock when a command is dispatched, so a
//! [`StateReader`] only ever sees a whole geometry. Loading or unloading an
//! image cancels and discards any job still in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle};

use crate::command::{parse_command, Command};
use crate::config::{ConfigError, TransformConfig};
use crate::dispatch::{reject, Dispatcher, ErrorKind, TransformResult};
use crate::geometry::ImageGeometry;
use crate::pixels::{FilterType, PixelBuffer, PixelDirective, PixelError, PixelSink};
use crate::state::{ImageState, PixelHandle};

/// A directive being carried out on the worker thread.
#[derive(Debug)]
struct PendingJob {
    /// Geometry before the command, restored if the job does not land.
    previous: ImageGeometry,
    /// Geometry committed at dispatch.
    committed: ImageGeometry,
    cancel: Arc<AtomicBool>,
    done: Receiver<Result<(), PixelError>>,
    worker: JoinHandle<()>,
}

/// Sink over the session's shared buffer for inline pixel work.
struct SharedBufferSink<'a> {
    buffer: &'a mut Option<PixelBuffer>,
    filter: FilterType,
}

impl PixelSink for SharedBufferSink<'_> {
    fn apply(&mut self, _: PixelHandle, directive: &PixelDirective) -> Result<(), PixelError> {
        self.buffer
            .as_mut()
            .ok_or(PixelError::EmptyBuffer)?
            .apply_directive(directive, self.filter)
    }
}

/// Read-only view of a session's state, safe to share across threads.
#[derive(Debug, Clone)]
pub struct StateReader {
    state: Arc<RwLock<ImageState>>,
}

impl StateReader {
    pub fn snapshot(&self) -> ImageState {
        *read_lock(&self.state)
    }

    pub fn geometry(&self) -> Option<ImageGeometry> {
        self.snapshot().geometry()
    }
}

/// Owns the current image state and its pixels.
#[derive(Debug)]
pub struct ImageSession {
    dispatcher: Dispatcher,
    state: Arc<RwLock<ImageState>>,
    buffer: Arc<Mutex<Option<PixelBuffer>>>,
    next_handle: u64,
    pending: Option<PendingJob>,
}

impl Default for ImageSession {
    fn default() -> Self {
        Self::with_dispatcher(Dispatcher::default())
    }
}

impl ImageSession {
    /// Create an empty session with a validated config.
    pub fn new(config: TransformConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_dispatcher(Dispatcher::new(config)?))
    }

    fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            state: Arc::new(RwLock::new(ImageState::Empty)),
            buffer: Arc::new(Mutex::new(None)),
            next_handle: 1,
            pending: None,
        }
    }

    pub fn config(&self) -> &TransformConfig {
        self.dispatcher.config()
    }

    /// A cloneable reader over this session's state.
    pub fn reader(&self) -> StateReader {
        StateReader {
            state: Arc::clone(&self.state),
        }
    }

    pub fn state(&self) -> ImageState {
        *read_lock(&self.state)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Replace the current image. Any in-flight job is discarded first.
    pub fn load(&mut self, buffer: PixelBuffer) -> Result<PixelHandle, PixelError> {
        let geometry = buffer.geometry()?;
        self.discard_pending();

        let handle = PixelHandle::new(self.next_handle);
        self.next_handle += 1;

        *lock(&self.buffer) = Some(buffer);
        write_lock(&self.state).load(geometry, handle);
        log::info!("loaded {} image as {:?}", geometry, handle);
        Ok(handle)
    }

    /// Drop the current image. Any in-flight job is discarded first.
    pub fn unload(&mut self) {
        self.discard_pending();

        *lock(&self.buffer) = None;
        write_lock(&self.state).unload();
        log::info!("image unloaded");
    }

    /// Dispatch one command string against the current image.
    ///
    /// Waits for the previous job first. On a large image the returned
    /// `Applied` geometry is already visible to readers while the pixels are
    /// still being processed; call [`wait`](Self::wait) to learn whether
    /// they landed.
    pub fn run(&mut self, input: &str) -> TransformResult {
        if let Err(err) = self.wait() {
            log::warn!("previous pixel job failed: {}", err);
        }

        let command = match parse_command(input) {
            Ok(command) => command,
            Err(err) => return reject(input, err.into()),
        };

        let mut state = write_lock(&self.state);
        match self.background_job(&command, &state) {
            Ok(Some(job)) => {
                let geometry = job.committed;
                state.set_geometry(geometry);
                self.pending = Some(job);
                log::info!("{} dispatched, image is now {}", command.name(), geometry);
                return TransformResult::Applied(geometry);
            }
            Ok(None) => {}
            Err(err) => return reject(input, ErrorKind::PixelData(err)),
        }

        let mut buffer = lock(&self.buffer);
        let mut sink = SharedBufferSink {
            buffer: &mut *buffer,
            filter: self.dispatcher.config().filter,
        };
        self.dispatcher.dispatch_command(&command, &mut state, &mut sink)
    }

    /// Block until the in-flight job, if any, has finished.
    ///
    /// A failed job has its geometry reverted and its error returned.
    pub fn wait(&mut self) -> Result<(), PixelError> {
        let Some(job) = self.pending.take() else {
            return Ok(());
        };
        let (previous, committed) = (job.previous, job.committed);

        if let Err(err) = finish(job) {
            self.revert(committed, previous);
            return Err(err);
        }
        Ok(())
    }

    /// Cancel the in-flight job and restore the geometry it replaced.
    ///
    /// Returns `false` when there was nothing to cancel or the job had
    /// already written its pixels; the geometry is then kept.
    pub fn cancel_pending(&mut self) -> bool {
        let Some(job) = self.pending.take() else {
            return false;
        };
        job.cancel.store(true, Ordering::Release);
        let (previous, committed) = (job.previous, job.committed);

        if finish(job).is_ok() {
            return false;
        }
        self.revert(committed, previous);
        log::warn!("pending pixel job cancelled, image is back to {}", previous);
        true
    }

    /// A copy of the current pixels, once any in-flight job has finished.
    pub fn pixels(&mut self) -> Option<PixelBuffer> {
        if let Err(err) = self.wait() {
            log::warn!("pixel job failed: {}", err);
        }
        lock(&self.buffer).clone()
    }

    /// Start the pixel work for `command` on the worker when the image is
    /// large enough. `None` leaves the command to the inline dispatcher.
    fn background_job(
        &self,
        command: &Command,
        state: &ImageState,
    ) -> Result<Option<PendingJob>, PixelError> {
        let Ok(Some((_, output))) = self.dispatcher.plan(command, state) else {
            return Ok(None);
        };
        let Some(previous) = state.geometry() else {
            return Ok(None);
        };

        let config = self.dispatcher.config();
        let size = previous.pixel_count().max(output.geometry.pixel_count());
        if output.directive.is_identity() || size < config.background_pixel_threshold {
            return Ok(None);
        }

        let (tx, done) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let buffer = Arc::clone(&self.buffer);
        let flag = Arc::clone(&cancel);
        let (directive, filter) = (output.directive, config.filter);

        let worker = thread::Builder::new()
            .name("imcommand-pixels".to_string())
            .spawn(move || {
                let result = run_job(&buffer, &directive, filter, &flag);
                // The session may already have stopped listening.
                let _ = tx.send(result);
            })
            .map_err(|err| PixelError::Host(err.to_string()))?;

        log::debug!("pixel job for {} moved to worker", command.name());
        Ok(Some(PendingJob {
            previous,
            committed: output.geometry,
            cancel,
            done,
            worker,
        }))
    }

    fn discard_pending(&mut self) {
        if let Some(job) = self.pending.take() {
            job.cancel.store(true, Ordering::Release);
            let result = finish(job);
            log::warn!("discarded pixel job: {:?}", result);
        }
    }

    /// Restore `previous` if the state still shows the geometry committed
    /// for the job.
    fn revert(&self, committed: ImageGeometry, previous: ImageGeometry) {
        let mut state = write_lock(&self.state);
        if state.geometry() == Some(committed) {
            state.set_geometry(previous);
        }
    }
}

impl Drop for ImageSession {
    fn drop(&mut self) {
        self.discard_pending();
    }
}

/// Carry out `directive` on a copy of the buffer and swap it in unless
/// cancelled.
fn run_job(
    buffer: &Mutex<Option<PixelBuffer>>,
    directive: &PixelDirective,
    filter: FilterType,
    cancel: &AtomicBool,
) -> Result<(), PixelError> {
    let mut work = lock(buffer).clone().ok_or(PixelError::EmptyBuffer)?;
    if cancel.load(Ordering::Acquire) {
        return Err(PixelError::Cancelled);
    }

    work.apply_directive(directive, filter)?;

    let mut guard = lock(buffer);
    if cancel.load(Ordering::Acquire) {
        return Err(PixelError::Cancelled);
    }
    *guard = Some(work);
    Ok(())
}

/// Wait for a job's completion message and reap its thread.
fn finish(job: PendingJob) -> Result<(), PixelError> {
    let result = job.done.recv().unwrap_or_else(|_| {
        Err(PixelError::Host("pixel worker exited without reporting".to_string()))
    });
    if job.worker.join().is_err() {
        log::error!("pixel worker panicked");
    }
    result
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
