use crate::{
    config::GRAVITY_SCALE,
    types::{Direction, EmitterId},
    weights::DirectionWeights,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Whether an emitter pulls particles in or pushes them away.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmitterKind {
    #[default]
    Attract,
    Repel,
}

impl EmitterKind {
    pub fn name(&self) -> &'static str {
        match self {
            EmitterKind::Attract => "Attract",
            EmitterKind::Repel => "Repel",
        }
    }
}

/// A user-placed point that biases particle steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Emitter {
    pub id: EmitterId,
    pub kind: EmitterKind,
    pub pos: Vec2,
}

impl Emitter {
    /// Adds this emitter's bias at `pos` into `weights`.
    ///
    /// The distance is floored at 1 px, so a particle sitting on the emitter
    /// gets a bounded push instead of a singularity. Strength falls off as
    /// `1 / dist`, which keeps far emitters noticeable.
    #[inline]
    pub fn accumulate_into(&self, pos: Vec2, base_strength: f32, weights: &mut DirectionWeights) {
        let g = self.pos - pos;
        let dist = g.length().max(1.0);
        let mut dir = g / dist;
        if self.kind == EmitterKind::Repel {
            dir = -dir;
        }
        let strength = (base_strength * GRAVITY_SCALE) / dist;
        weights.add_projected(dir, strength);
    }
}

/// Insertion-ordered collection of emitters.
///
/// List order only matters for hit-test ties (earliest wins) and for the
/// order the renderer draws them in.
#[derive(Debug, Default)]
pub struct GravityField {
    emitters: Vec<Emitter>,
    next_id: EmitterId,
}

impl GravityField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new emitter and returns its id.
    pub fn add_emitter(&mut self, kind: EmitterKind, pos: Vec2) -> EmitterId {
        let id = self.next_id;
        self.next_id += 1;
        self.emitters.push(Emitter { id, kind, pos });
        id
    }

    /// Moves emitter `id` to `pos`. Returns `false` if no such emitter exists.
    pub fn move_emitter(&mut self, id: EmitterId, pos: Vec2) -> bool {
        match self.emitters.iter_mut().find(|e| e.id == id) {
            Some(e) => {
                e.pos = pos;
                true
            }
            None => false,
        }
    }

    /// Removes the first emitter (in list order) within `hit_radius` of `pos`.
    ///
    /// ### Returns
    /// The removed emitter, or `None` if nothing was hit.
    pub fn remove_nearest(&mut self, pos: Vec2, hit_radius: f32) -> Option<Emitter> {
        let idx = self
            .emitters
            .iter()
            .position(|e| e.pos.distance(pos) <= hit_radius)?;
        Some(self.emitters.remove(idx))
    }

    pub fn clear(&mut self) {
        self.emitters.clear();
    }

    pub fn get(&self, id: EmitterId) -> Option<&Emitter> {
        self.emitters.iter().find(|e| e.id == id)
    }

    #[inline]
    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.emitters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.emitters.is_empty()
    }

    /// Adds the bias of every emitter at `pos` into `weights`.
    #[inline]
    pub fn accumulate_into(&self, pos: Vec2, base_strength: f32, weights: &mut DirectionWeights) {
        for e in &self.emitters {
            e.accumulate_into(pos, base_strength, weights);
        }
    }

    /// Returns the summed emitter bias at `pos`, one value per [`Direction`]
    /// slot.
    pub fn bias_contribution(&self, pos: Vec2, base_strength: f32) -> [f32; Direction::COUNT] {
        let mut weights = DirectionWeights::zero();
        self.accumulate_into(pos, base_strength, &mut weights);
        weights.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn attract_emitter_biases_towards_itself() {
        let mut field = GravityField::new();
        field.add_emitter(EmitterKind::Attract, Vec2::new(110.0, 100.0));

        let base = 200.0;
        let bias = field.bias_contribution(Vec2::new(100.0, 100.0), base);
        let strength = base * 5.0 / 10.0;

        assert!((bias[Direction::E.index()] - strength).abs() < EPS);
        assert!((bias[Direction::NE.index()] - strength * 0.707_106_8).abs() < EPS);
        assert!((bias[Direction::SE.index()] - strength * 0.707_106_8).abs() < EPS);
        for d in [
            Direction::N,
            Direction::S,
            Direction::W,
            Direction::NW,
            Direction::SW,
        ] {
            assert_eq!(bias[d.index()], 0.0);
        }
    }

    #[test]
    fn repel_emitter_biases_away() {
        let mut field = GravityField::new();
        field.add_emitter(EmitterKind::Repel, Vec2::new(100.0, 90.0));

        let bias = field.bias_contribution(Vec2::new(100.0, 100.0), 10.0);

        // Emitter is north of the particle, so the push goes south.
        assert!((bias[Direction::S.index()] - 5.0).abs() < EPS);
        assert_eq!(bias[Direction::N.index()], 0.0);
    }

    #[test]
    fn distance_is_floored_at_one() {
        let mut field = GravityField::new();
        field.add_emitter(EmitterKind::Attract, Vec2::new(100.3, 100.0));

        let bias = field.bias_contribution(Vec2::new(100.0, 100.0), 1.0);
        assert!((bias[Direction::E.index()] - 0.3 * 5.0).abs() < EPS);

        // Exactly on top: zero direction, no contribution, no NaN.
        let on_top = field.bias_contribution(Vec2::new(100.3, 100.0), 1.0);
        assert!(on_top.iter().all(|w| *w == 0.0));
    }

    #[test]
    fn contributions_add_independent_of_order() {
        let a = Vec2::new(50.0, 20.0);
        let b = Vec2::new(10.0, 80.0);
        let p = Vec2::new(30.0, 30.0);

        let mut ab = GravityField::new();
        ab.add_emitter(EmitterKind::Attract, a);
        ab.add_emitter(EmitterKind::Repel, b);

        let mut ba = GravityField::new();
        ba.add_emitter(EmitterKind::Repel, b);
        ba.add_emitter(EmitterKind::Attract, a);

        let x = ab.bias_contribution(p, 100.0);
        let y = ba.bias_contribution(p, 100.0);
        for k in 0..Direction::COUNT {
            assert!((x[k] - y[k]).abs() < EPS);
        }
    }

    #[test]
    fn remove_nearest_takes_first_match() {
        let mut field = GravityField::new();
        let a = field.add_emitter(EmitterKind::Attract, Vec2::new(10.0, 10.0));
        let b = field.add_emitter(EmitterKind::Repel, Vec2::new(10.0, 10.0));

        let removed = field.remove_nearest(Vec2::new(10.0, 10.0), 15.0).unwrap();
        assert_eq!(removed.id, a);
        assert_eq!(field.len(), 1);
        assert_eq!(field.emitters()[0].id, b);
    }

    #[test]
    fn remove_nearest_misses_outside_radius() {
        let mut field = GravityField::new();
        field.add_emitter(EmitterKind::Attract, Vec2::new(0.0, 0.0));

        assert!(field.remove_nearest(Vec2::new(15.0, 1.0), 15.0).is_none());
        assert_eq!(field.len(), 1);
        assert!(field.remove_nearest(Vec2::new(15.0, 0.0), 15.0).is_some());
        assert!(field.is_empty());
    }

    #[test]
    fn move_emitter_keeps_id_after_other_removal() {
        let mut field = GravityField::new();
        field.add_emitter(EmitterKind::Attract, Vec2::new(0.0, 0.0));
        let dragged = field.add_emitter(EmitterKind::Attract, Vec2::new(100.0, 0.0));

        field.remove_nearest(Vec2::new(0.0, 0.0), 15.0);
        assert!(field.move_emitter(dragged, Vec2::new(5.0, 5.0)));
        assert_eq!(field.get(dragged).unwrap().pos, Vec2::new(5.0, 5.0));
        assert!(!field.move_emitter(999, Vec2::ZERO));
    }
}
