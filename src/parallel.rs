use std::thread;
use std::sync::mpsc;
use std::sync::{ Arc, Mutex };

use log::{ debug, info, warn };

use crate::color::Color;
use crate::world::World;
use crate::camera::Camera;
use crate::canvas::Canvas;

/// A job for the worker pool.
pub enum Message {
    /// Render the row at this index.
    Row(usize),
    Terminate,
}

/// A rendered row, tagged with its index.
type RowResult = (usize, Vec<Color>);

struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    fn new(id: usize, world: Arc<World>, camera: Arc<Camera>,
        receiver: Arc<Mutex<mpsc::Receiver<Message>>>,
        results: mpsc::Sender<RowResult>) -> Worker {

        let thread = thread::spawn(move || {
            debug!("worker {} started", id);

            loop {
                // Obtain the message being executed. The lock is released
                // before rendering so other workers can pick up jobs.
                let message = match receiver.lock() {
                    Ok(rx) => rx.recv(),
                    Err(_) => break,
                };

                match message {
                    Ok(Message::Row(y)) => {
                        let row = camera.render_row(&world, y);
                        if results.send((y, row)).is_err() {
                            break;
                        }
                    },

                    // Exit the worker thread loop, terminating the thread.
                    Ok(Message::Terminate) | Err(_) => break,
                }
            }

            debug!("worker {} stopped", id);
        });

        Worker { id, thread: Some(thread) }
    }
}

/// A fixed-size pool of render workers sharing one job queue.
pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: mpsc::Sender<Message>,
}

impl ThreadPool {
    /// Spawns `size` workers (at least one). Rendered rows are sent to
    /// `results`.
    pub fn new(size: usize, world: Arc<World>, camera: Arc<Camera>,
        results: mpsc::Sender<RowResult>) -> ThreadPool {
        let size = size.max(1);

        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..size)
            .map(|id| Worker::new(
                id,
                Arc::clone(&world),
                Arc::clone(&camera),
                Arc::clone(&receiver),
                results.clone(),
            ))
            .collect();

        ThreadPool { workers, sender }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    pub fn execute(&self, message: Message) {
        if self.sender.send(message).is_err() {
            warn!("no render workers left to accept jobs");
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        for _ in &self.workers {
            // Workers that already exited have dropped their receiver.
            let _ = self.sender.send(Message::Terminate);
        }

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                if thread.join().is_err() {
                    warn!("worker {} panicked", worker.id);
                }
            }
        }
    }
}

/// The number of workers to spawn for `rows` row jobs: at least one and
/// never more than there are rows.
pub fn worker_count(threads: usize, rows: usize) -> usize {
    threads.min(rows).max(1)
}

/// Renders a world on a pool of `threads` workers, one row per job.
///
/// The result is the same canvas `Camera::render` produces; each row is
/// written exactly once, by this thread. The thread count is clamped by
/// `worker_count`.
pub fn render(world: &World, camera: &Camera, threads: usize) -> Canvas {
    let mut canvas = Canvas::new(camera.hsize, camera.vsize);
    let (results, rows) = mpsc::channel();

    let pool = ThreadPool::new(
        worker_count(threads, camera.vsize),
        Arc::new(world.clone()),
        Arc::new(camera.clone()),
        results,
    );
    info!("rendering {}x{} using {} threads", camera.hsize, camera.vsize,
        pool.size());

    for y in 0..camera.vsize {
        pool.execute(Message::Row(y));
    }

    let mut received = 0;
    while received < camera.vsize {
        match rows.recv() {
            Ok((y, row)) => {
                canvas.write_row(y, &row);
                received += 1;
            },

            // Every worker is gone; whatever was not rendered stays black.
            Err(_) => break,
        }
    }

    drop(pool);
    info!("rendered {} of {} rows", received, camera.vsize);

    canvas
}

#[cfg(test)]
use crate::matrix::Matrix4D;
#[cfg(test)]
use crate::tuple::Tuple4D;

#[cfg(test)]
fn small_camera() -> Camera {
    Camera::new(16, 9, std::f64::consts::PI / 2.0,
        Matrix4D::view_transform(
            Tuple4D::point(0.0, 0.0, -5.0),
            Tuple4D::point(0.0, 0.0, 0.0),
            Tuple4D::vector(0.0, 1.0, 0.0),
        ))
}

#[test]
fn parallel_matches_sequential() {
    let w = World::new();
    let c = small_camera();

    assert_eq!(render(&w, &c, 4), c.render(&w));
}

#[test]
fn more_threads_than_rows() {
    let w = World::new();
    let c = small_camera();

    assert_eq!(render(&w, &c, 32), c.render(&w));
}

#[test]
fn zero_threads_is_one() {
    let w = World::new();
    let c = small_camera();

    let (results, _rows) = mpsc::channel();
    let pool = ThreadPool::new(0, Arc::new(w.clone()), Arc::new(c.clone()),
        results);
    assert_eq!(pool.size(), 1);
    drop(pool);

    assert_eq!(render(&w, &c, 0), c.render(&w));
}

#[test]
fn worker_count_is_clamped_to_rows() {
    let c = small_camera();

    assert_eq!(worker_count(32, c.vsize), 9);
    assert_eq!(worker_count(4, c.vsize), 4);
    assert_eq!(worker_count(0, c.vsize), 1);
    assert_eq!(worker_count(8, 0), 1);
}
