//! FIFO byte-buffer writers for message transports.
//!
//! A transport (for example a language-server connection over a pipe) submits
//! whole message buffers and needs two guarantees: buffers reach the sink in
//! submission order, and `flush` does not return until everything submitted
//! before it has been handed to the sink.
//!
//! Two implementations are provided:
//!
//! - [`BackgroundThreadPipeWriter`] wraps a blocking sink. Writes enqueue and
//!   return immediately; a dedicated worker thread drains the queue. One mutex
//!   and two condition variables (`data_is_pending`, `data_is_flushed`)
//!   serialize `write` and `flush` against the worker.
//! - [`NonBlockingPipeWriter`] wraps a non-blocking sink (one whose `write`
//!   returns [`io::ErrorKind::WouldBlock`] when full). Writes drain as much as
//!   possible immediately; the host calls [`NonBlockingPipeWriter::on_writable`]
//!   whenever its readiness mechanism (`poll`, `kqueue`, ...) reports the sink
//!   writable, and [`NonBlockingPipeWriter::flush_with`] loops a host-supplied
//!   readiness wait until the queue is empty.

use std::collections::VecDeque;
use std::io;
use std::io::Write;
use std::sync::Arc;
use std::sync::Condvar;
use std::sync::Mutex;
use std::thread;

/// A writer accepting whole byte buffers with FIFO delivery.
pub trait PipeWriter {
  /// Submits one buffer. Ordering across calls is preserved.
  fn write(&mut self, data: Vec<u8>);
  /// Blocks until every previously submitted buffer has been handed to the
  /// underlying sink.
  fn flush(&mut self);
}

struct QueueState {
  pending: VecDeque<Vec<u8>>,
  writing: bool,
  stop: bool,
}

struct Shared {
  state: Mutex<QueueState>,
  data_is_pending: Condvar,
  data_is_flushed: Condvar,
}

/// Blocking-sink writer with a dedicated flushing thread.
pub struct BackgroundThreadPipeWriter {
  shared: Arc<Shared>,
  flushing_thread: Option<thread::JoinHandle<()>>,
}

impl BackgroundThreadPipeWriter {
  pub fn new<W: Write + Send + 'static>(mut pipe: W) -> Self {
    let shared = Arc::new(Shared {
      state: Mutex::new(QueueState {
        pending: VecDeque::new(),
        writing: false,
        stop: false,
      }),
      data_is_pending: Condvar::new(),
      data_is_flushed: Condvar::new(),
    });

    let worker_shared = Arc::clone(&shared);
    let flushing_thread = thread::spawn(move || {
      let mut state = worker_shared.state.lock().unwrap();
      loop {
        while !state.stop && state.pending.is_empty() {
          state = worker_shared.data_is_pending.wait(state).unwrap();
        }
        if state.stop {
          break;
        }

        let to_write: Vec<Vec<u8>> = state.pending.drain(..).collect();
        state.writing = true;
        drop(state);
        for buffer in &to_write {
          // The sink is blocking; short writes are retried by write_all.
          pipe.write_all(buffer).expect("pipe write failed");
        }
        pipe.flush().expect("pipe flush failed");
        state = worker_shared.state.lock().unwrap();
        state.writing = false;
        if state.pending.is_empty() {
          worker_shared.data_is_flushed.notify_all();
        }
      }
    });

    Self {
      shared,
      flushing_thread: Some(flushing_thread),
    }
  }
}

impl PipeWriter for BackgroundThreadPipeWriter {
  fn write(&mut self, data: Vec<u8>) {
    let mut state = self.shared.state.lock().unwrap();
    assert!(!state.stop);
    state.pending.push_back(data);
    self.shared.data_is_pending.notify_one();
  }

  fn flush(&mut self) {
    let mut state = self.shared.state.lock().unwrap();
    assert!(!state.stop);
    while state.writing || !state.pending.is_empty() {
      state = self.shared.data_is_flushed.wait(state).unwrap();
    }
  }
}

impl Drop for BackgroundThreadPipeWriter {
  fn drop(&mut self) {
    {
      let mut state = self.shared.state.lock().unwrap();
      state.stop = true;
      self.shared.data_is_pending.notify_one();
    }
    if let Some(thread) = self.flushing_thread.take() {
      thread.join().expect("flushing thread panicked");
    }
  }
}

/// Non-blocking-sink writer driven by readiness events.
pub struct NonBlockingPipeWriter<W: Write> {
  pipe: W,
  pending: VecDeque<Vec<u8>>,
  /// Bytes of the front buffer already written.
  front_offset: usize,
}

impl<W: Write> NonBlockingPipeWriter<W> {
  pub fn new(pipe: W) -> Self {
    Self {
      pipe,
      pending: VecDeque::new(),
      front_offset: 0,
    }
  }

  /// Submits one buffer and writes as much as the sink accepts right now.
  pub fn write(&mut self, data: Vec<u8>) {
    self.pending.push_back(data);
    self.write_as_much_as_possible();
  }

  /// Call when the host's readiness mechanism reports the sink writable.
  pub fn on_writable(&mut self) {
    self.write_as_much_as_possible();
  }

  /// Whether the host still needs to watch for writability.
  pub fn has_pending(&self) -> bool {
    !self.pending.is_empty()
  }

  /// Blocks until the queue is drained, calling `wait_writable` between
  /// attempts. The callback typically polls the sink's file descriptor.
  pub fn flush_with(&mut self, mut wait_writable: impl FnMut()) {
    while self.has_pending() {
      wait_writable();
      self.write_as_much_as_possible();
    }
  }

  fn write_as_much_as_possible(&mut self) {
    while let Some(front) = self.pending.front() {
      debug_assert!(self.front_offset < front.len() || front.is_empty());
      if front.is_empty() {
        self.pending.pop_front();
        self.front_offset = 0;
        continue;
      }
      match self.pipe.write(&front[self.front_offset..]) {
        Ok(0) => break,
        Ok(written) => {
          self.front_offset += written;
          if self.front_offset == front.len() {
            self.pending.pop_front();
            self.front_offset = 0;
          }
        }
        Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
        Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
        Err(err) => panic!("pipe write failed: {err}"),
      }
    }
  }
}
