use glam::Vec2;
use rand::Rng;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        assert!(
            min.x <= max.x && min.y <= max.y,
            "aabb min {:?} exceeds max {:?}",
            min,
            max
        );
        Self { min, max }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    // Inclusive on all four edges.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    // Touching edges count as intersecting.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    // Strict comparison: a circle exactly tangent to the box does not intersect.
    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        let clamped = circle.center.clamp(self.min, self.max);
        clamped.distance_squared(circle.center) < circle.radius * circle.radius
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.min += offset;
        self.max += offset;
    }

    pub fn translated(&self, offset: Vec2) -> Aabb {
        Aabb {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    pub fn random_point_inside<R: Rng>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            rng.gen_range(self.min.x..=self.max.x),
            rng.gen_range(self.min.y..=self.max.y),
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        assert!(radius >= 0.0, "negative circle radius: {}", radius);
        Self { center, radius }
    }

    // Strict: a point exactly on the rim is outside.
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance_squared(point) < self.radius * self.radius
    }

    // Strict: externally tangent circles do not intersect.
    pub fn intersects(&self, other: &Circle) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) < reach * reach
    }

    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        aabb.intersects_circle(self)
    }
}
