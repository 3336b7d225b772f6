//! Obstacle pool
//!
//! Capacity-bounded free list that recycles obstacle instances instead of
//! allocating every spawn. Callers must treat a dequeued instance as newly
//! constructed: every randomized field and every per-lifetime flag is
//! reconfigured here, never by the caller.

use glam::Vec2;

use super::state::{Obstacle, ObstacleVariant};
use crate::consts::OBSTACLE_POOL_CAPACITY;

/// Freshly sampled configuration for a (re)spawned obstacle
#[derive(Debug, Clone, Copy)]
pub struct ObstacleParams {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub variant: ObstacleVariant,
}

/// Parked obstacle instances, at most `capacity` retained
#[derive(Debug, Clone)]
pub struct ObstaclePool {
    parked: Vec<Obstacle>,
    capacity: usize,
}

impl Default for ObstaclePool {
    fn default() -> Self {
        Self::with_capacity(OBSTACLE_POOL_CAPACITY)
    }
}

impl ObstaclePool {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            parked: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Reuse a parked instance if available, else construct one. All fields
    /// are overwritten from `params` either way; in particular the
    /// near-miss and dodge flags are always cleared here.
    pub fn dequeue(&mut self, id: u32, params: ObstacleParams) -> Obstacle {
        let mut obstacle = self.parked.pop().unwrap_or(Obstacle {
            id: 0,
            pos: Vec2::ZERO,
            width: 0.0,
            height: 0.0,
            speed: 0.0,
            variant: ObstacleVariant::Wide,
            near_miss_done: false,
            dodged: false,
        });
        obstacle.id = id;
        obstacle.pos = params.pos;
        obstacle.width = params.width;
        obstacle.height = params.height;
        obstacle.speed = params.speed;
        obstacle.variant = params.variant;
        obstacle.near_miss_done = false;
        obstacle.dodged = false;
        obstacle
    }

    /// Park an instance for reuse. Beyond capacity the instance is simply
    /// dropped, so the pool never grows unbounded under sustained spawning.
    pub fn recycle(&mut self, obstacle: Obstacle) {
        if self.parked.len() < self.capacity {
            self.parked.push(obstacle);
        }
    }

    pub fn parked_count(&self) -> usize {
        self.parked.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ObstacleParams {
        ObstacleParams {
            pos: Vec2::new(100.0, 800.0),
            width: 60.0,
            height: 24.0,
            speed: 300.0,
            variant: ObstacleVariant::Narrow,
        }
    }

    #[test]
    fn test_dequeue_constructs_when_empty() {
        let mut pool = ObstaclePool::default();
        let obstacle = pool.dequeue(1, params());
        assert_eq!(obstacle.id, 1);
        assert_eq!(obstacle.width, 60.0);
        assert_eq!(pool.parked_count(), 0);
    }

    #[test]
    fn test_recycled_instance_has_no_stale_flags() {
        let mut pool = ObstaclePool::default();
        let mut obstacle = pool.dequeue(1, params());
        obstacle.near_miss_done = true;
        obstacle.dodged = true;
        obstacle.pos.y = -50.0;
        pool.recycle(obstacle);

        let fresh = pool.dequeue(2, params());
        assert_eq!(fresh.id, 2);
        assert!(!fresh.near_miss_done);
        assert!(!fresh.dodged);
        assert_eq!(fresh.pos, Vec2::new(100.0, 800.0));
    }

    #[test]
    fn test_parked_count_never_exceeds_capacity() {
        let mut pool = ObstaclePool::with_capacity(4);
        // Sequential dequeue/recycle cycles well past capacity
        for i in 0..20 {
            let obstacle = pool.dequeue(i, params());
            pool.recycle(obstacle);
            assert!(pool.parked_count() <= 4);
        }

        // Bulk recycle past capacity drops the excess
        let extra: Vec<_> = (0..10).map(|i| pool.dequeue(100 + i, params())).collect();
        for obstacle in extra {
            pool.recycle(obstacle);
        }
        assert_eq!(pool.parked_count(), 4);
    }
}
