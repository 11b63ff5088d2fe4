//! Collection-level flashcard operations over any [`Store`].
//!
//! Each call reads the collection it needs, changes it, and writes the whole
//! collection back. Nothing is cached between calls.

use crate::database::Store;
use crate::error::{Error, RecordKind, Result};
use crate::generator::FlashcardGenerator;
use crate::models::flashcard::DEFAULT_DIFFICULTY;
use crate::models::scheduler;
use crate::models::sm2::{self, Score};
use crate::models::{Deck, DifficultyBucket, Flashcard, Material, ReviewSession};
use chrono::{DateTime, Local, TimeZone, Utc};
use uuid::Uuid;

/// Counts shown next to a material's deck.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeckStats {
    pub total: usize,
    pub mastered: usize,
    pub learning: usize,
    pub difficult: usize,
    pub due_today: usize,
}

pub struct StudyService<S> {
    store: S,
}

impl<S: Store> StudyService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // ==================== Flashcards ====================

    /// All cards, or only those of `material_id`, in stored order.
    pub fn flashcards(&self, material_id: Option<Uuid>) -> Result<Vec<Flashcard>> {
        let cards = self.store.load_flashcards()?;
        Ok(match material_id {
            Some(id) => cards.into_iter().filter(|c| c.material_id == id).collect(),
            None => cards,
        })
    }

    pub fn due_flashcards(&self, material_id: Option<Uuid>) -> Result<Vec<Flashcard>> {
        let cards = self.flashcards(material_id)?;
        Ok(scheduler::partition_due(cards, Utc::now()).0)
    }

    pub fn due_flashcards_at<Tz: TimeZone>(
        &self,
        material_id: Option<Uuid>,
        as_of: DateTime<Utc>,
        tz: &Tz,
    ) -> Result<Vec<Flashcard>> {
        let cards = self.flashcards(material_id)?;
        Ok(scheduler::partition_due_in(cards, as_of, tz).0)
    }

    pub fn add_flashcard(
        &mut self,
        material_id: Uuid,
        question: String,
        answer: String,
        difficulty_level: u8,
    ) -> Result<Flashcard> {
        let card = Flashcard::new(material_id, question, answer, Utc::now()).with_difficulty(difficulty_level);
        let mut cards = self.store.load_flashcards()?;
        cards.push(card.clone());
        self.store.save_flashcards(&cards)?;
        Ok(card)
    }

    /// Adds a card with the default medium difficulty.
    pub fn add_default_flashcard(&mut self, material_id: Uuid, question: String, answer: String) -> Result<Flashcard> {
        self.add_flashcard(material_id, question, answer, DEFAULT_DIFFICULTY)
    }

    pub fn update_flashcard(&mut self, card: Flashcard) -> Result<Flashcard> {
        let mut cards = self.store.load_flashcards()?;
        let slot = cards
            .iter_mut()
            .find(|c| c.id == card.id)
            .ok_or(Error::NotFound {
                kind: RecordKind::Flashcard,
                id: card.id,
            })?;
        *slot = card.clone();
        self.store.save_flashcards(&cards)?;
        Ok(card)
    }

    /// Removes the card if it exists.
    pub fn delete_flashcard(&mut self, id: Uuid) -> Result<()> {
        let mut cards = self.store.load_flashcards()?;
        cards.retain(|c| c.id != id);
        self.store.save_flashcards(&cards)?;
        Ok(())
    }

    /// Returns how many cards were removed.
    pub fn delete_flashcards_by_material(&mut self, material_id: Uuid) -> Result<usize> {
        let mut cards = self.store.load_flashcards()?;
        let before = cards.len();
        cards.retain(|c| c.material_id != material_id);
        let removed = before - cards.len();
        self.store.save_flashcards(&cards)?;
        log::info!("deleted {} flashcards of material {}", removed, material_id);
        Ok(removed)
    }

    pub fn review_flashcard(&mut self, id: Uuid, performance_score: i32) -> Result<Flashcard> {
        self.review_flashcard_at(id, performance_score, Utc::now())
    }

    pub fn review_flashcard_at(&mut self, id: Uuid, performance_score: i32, now: DateTime<Utc>) -> Result<Flashcard> {
        let score = Score::new(performance_score)?;
        let mut cards = self.store.load_flashcards()?;
        let slot = cards.iter_mut().find(|c| c.id == id).ok_or(Error::NotFound {
            kind: RecordKind::Flashcard,
            id,
        })?;

        *slot = sm2::review_at(&*slot, score, now);
        let reviewed = slot.clone();
        self.store.save_flashcards(&cards)?;
        log::debug!(
            "reviewed {} with score {}: interval {} days, ease {:.2}",
            id,
            performance_score,
            reviewed.interval_days,
            reviewed.ease_factor
        );
        Ok(reviewed)
    }

    /// Saves graded cards coming back from a learning session.
    pub fn store_reviewed(&mut self, reviewed: &[Flashcard]) -> Result<()> {
        let mut cards = self.store.load_flashcards()?;
        for card in reviewed {
            let slot = cards.iter_mut().find(|c| c.id == card.id).ok_or(Error::NotFound {
                kind: RecordKind::Flashcard,
                id: card.id,
            })?;
            *slot = card.clone();
        }
        self.store.save_flashcards(&cards)?;
        Ok(())
    }

    /// Asks `generator` for cards and saves them under `material_id`.
    /// Nothing is written when the generator fails.
    pub fn generate_flashcards<G: FlashcardGenerator + ?Sized>(
        &mut self,
        generator: &G,
        material_id: Uuid,
        content: &str,
        count: usize,
    ) -> Result<Vec<Flashcard>> {
        let generated = generator.generate(content, count)?;
        let now = Utc::now();
        let new_cards: Vec<Flashcard> = generated
            .into_iter()
            .map(|g| Flashcard::new(material_id, g.question, g.answer, now))
            .collect();

        let mut cards = self.store.load_flashcards()?;
        cards.extend(new_cards.iter().cloned());
        self.store.save_flashcards(&cards)?;
        log::info!("generated {} flashcards for material {}", new_cards.len(), material_id);
        Ok(new_cards)
    }

    /// Adds the cards of an imported deck as new cards of `material_id`.
    pub fn import_deck(&mut self, deck: &Deck, material_id: Uuid) -> Result<Vec<Flashcard>> {
        let now = Utc::now();
        let new_cards: Vec<Flashcard> = deck
            .flashcards
            .iter()
            .map(|c| {
                Flashcard::new(material_id, c.question.clone(), c.answer.clone(), now).with_difficulty(c.difficulty_level)
            })
            .collect();

        let mut cards = self.store.load_flashcards()?;
        cards.extend(new_cards.iter().cloned());
        self.store.save_flashcards(&cards)?;
        Ok(new_cards)
    }

    pub fn export_deck(&self, material_id: Uuid) -> Result<Deck> {
        let cards = self.store.load_flashcards()?;
        Ok(Deck::from_cards(material_id, &cards))
    }

    pub fn stats(&self, material_id: Option<Uuid>) -> Result<DeckStats> {
        self.stats_at(material_id, Utc::now(), &Local)
    }

    pub fn stats_at<Tz: TimeZone>(
        &self,
        material_id: Option<Uuid>,
        as_of: DateTime<Utc>,
        tz: &Tz,
    ) -> Result<DeckStats> {
        let cards = self.flashcards(material_id)?;
        let mut stats = DeckStats {
            total: cards.len(),
            ..DeckStats::default()
        };
        for card in &cards {
            match card.difficulty_bucket() {
                DifficultyBucket::Mastered => stats.mastered += 1,
                DifficultyBucket::Learning => stats.learning += 1,
                DifficultyBucket::Difficult => stats.difficult += 1,
            }
            if scheduler::is_due_in(card, as_of, tz) {
                stats.due_today += 1;
            }
        }
        Ok(stats)
    }

    // ==================== Review sessions ====================

    pub fn record_session(
        &mut self,
        material_id: Uuid,
        cards_completed: u32,
        total_cards: u32,
        duration_seconds: u64,
    ) -> Result<ReviewSession> {
        self.save_session(ReviewSession::record(material_id, cards_completed, total_cards, duration_seconds))
    }

    /// Appends an already built record, e.g. from `LearningSession::finish`.
    pub fn save_session(&mut self, session: ReviewSession) -> Result<ReviewSession> {
        let mut sessions = self.store.load_sessions()?;
        sessions.push(session.clone());
        self.store.save_sessions(&sessions)?;
        log::info!(
            "recorded session {}: {}/{} cards in {}s",
            session.id,
            session.cards_completed,
            session.total_cards,
            session.duration
        );
        Ok(session)
    }

    pub fn sessions(&self) -> Result<Vec<ReviewSession>> {
        Ok(self.store.load_sessions()?)
    }

    pub fn delete_session(&mut self, id: Uuid) -> Result<()> {
        let mut sessions = self.store.load_sessions()?;
        sessions.retain(|s| s.id != id);
        self.store.save_sessions(&sessions)?;
        Ok(())
    }

    // ==================== Materials ====================

    pub fn materials(&self) -> Result<Vec<Material>> {
        Ok(self.store.load_materials()?)
    }

    pub fn material(&self, id: Uuid) -> Result<Material> {
        self.materials()?
            .into_iter()
            .find(|m| m.id == id)
            .ok_or(Error::NotFound {
                kind: RecordKind::Material,
                id,
            })
    }

    pub fn add_material(&mut self, material: Material) -> Result<Material> {
        let mut materials = self.store.load_materials()?;
        materials.push(material.clone());
        self.store.save_materials(&materials)?;
        Ok(material)
    }

    /// Deletes the material together with its flashcards.
    pub fn delete_material(&mut self, id: Uuid) -> Result<()> {
        let mut materials = self.store.load_materials()?;
        materials.retain(|m| m.id != id);
        self.store.save_materials(&materials)?;
        self.delete_flashcards_by_material(id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::database::test_support::sample_material;
    use crate::generator::{GeneratedCard, GeneratorError, ModelOutputGenerator};
    use chrono::Duration;

    fn service() -> StudyService<MemoryStore> {
        StudyService::new(MemoryStore::default())
    }

    struct FailingGenerator;

    impl FlashcardGenerator for FailingGenerator {
        fn generate(&self, _content: &str, _count: usize) -> std::result::Result<Vec<GeneratedCard>, GeneratorError> {
            Err(GeneratorError::Backend("rate limited".into()))
        }
    }

    #[test]
    fn test_add_and_filter_by_material() {
        let mut svc = service();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        svc.add_default_flashcard(a, "q1".into(), "a1".into()).unwrap();
        svc.add_flashcard(b, "q2".into(), "a2".into(), 5).unwrap();
        svc.add_default_flashcard(a, "q3".into(), "a3".into()).unwrap();

        let only_a = svc.flashcards(Some(a)).unwrap();
        assert_eq!(only_a.iter().map(|c| c.question.as_str()).collect::<Vec<_>>(), ["q1", "q3"]);
        assert_eq!(svc.flashcards(None).unwrap().len(), 3);
    }

    #[test]
    fn test_review_by_id_persists() {
        let mut svc = service();
        let card = svc.add_default_flashcard(Uuid::new_v4(), "q".into(), "a".into()).unwrap();
        let now = Utc::now();

        let reviewed = svc.review_flashcard_at(card.id, 5, now).unwrap();
        assert_eq!(reviewed.repetition_count, 1);
        assert_eq!(reviewed.next_review_date, now + Duration::days(1));
        assert_eq!(svc.flashcards(None).unwrap(), vec![reviewed]);
    }

    #[test]
    fn test_review_rejects_bad_score_before_lookup() {
        let mut svc = service();
        let card = svc.add_default_flashcard(Uuid::new_v4(), "q".into(), "a".into()).unwrap();

        assert!(matches!(svc.review_flashcard(card.id, 7), Err(Error::InvalidScore(7))));
        assert!(matches!(svc.review_flashcard(Uuid::new_v4(), 9), Err(Error::InvalidScore(9))));
        assert_eq!(svc.flashcards(None).unwrap(), vec![card]);
    }

    #[test]
    fn test_missing_ids_are_not_found() {
        let mut svc = service();
        let missing = Uuid::new_v4();
        assert!(matches!(
            svc.review_flashcard(missing, 3),
            Err(Error::NotFound { kind: RecordKind::Flashcard, id }) if id == missing
        ));

        let stray = Flashcard::new(Uuid::new_v4(), "q".into(), "a".into(), Utc::now());
        assert!(matches!(svc.update_flashcard(stray), Err(Error::NotFound { .. })));
        assert!(matches!(
            svc.material(missing),
            Err(Error::NotFound { kind: RecordKind::Material, .. })
        ));
    }

    #[test]
    fn test_due_flashcards_by_calendar_day() {
        let mut svc = service();
        let material = Uuid::new_v4();
        let now = Utc::now();
        let card = svc.add_default_flashcard(material, "q".into(), "a".into()).unwrap();
        let reviewed = svc.review_flashcard_at(card.id, 4, now).unwrap();

        assert!(svc.due_flashcards_at(Some(material), now, &Utc).unwrap().is_empty());
        let tomorrow = now + Duration::days(1);
        assert_eq!(svc.due_flashcards_at(Some(material), tomorrow, &Utc).unwrap(), vec![reviewed]);
    }

    #[test]
    fn test_delete_by_material_and_single() {
        let mut svc = service();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        svc.add_default_flashcard(a, "q1".into(), "a1".into()).unwrap();
        svc.add_default_flashcard(a, "q2".into(), "a2".into()).unwrap();
        let keep = svc.add_default_flashcard(b, "q3".into(), "a3".into()).unwrap();

        assert_eq!(svc.delete_flashcards_by_material(a).unwrap(), 2);
        svc.delete_flashcard(Uuid::new_v4()).unwrap();
        assert_eq!(svc.flashcards(None).unwrap(), vec![keep.clone()]);

        svc.delete_flashcard(keep.id).unwrap();
        assert!(svc.flashcards(None).unwrap().is_empty());
    }

    #[test]
    fn test_generate_wraps_pairs_as_new_cards() {
        let mut svc = service();
        let material = Uuid::new_v4();
        let generator = ModelOutputGenerator::new(
            r#"[{"question": "What is DNA?", "answer": "Deoxyribonucleic acid"}, {"question": "What is RNA?", "answer": "Ribonucleic acid"}]"#.into(),
        );

        let cards = svc.generate_flashcards(&generator, material, "genetics notes", 10).unwrap();
        assert_eq!(cards.len(), 2);
        for card in &cards {
            assert_eq!(card.material_id, material);
            assert_eq!(card.difficulty_level, 3);
            assert_eq!(card.repetition_count, 0);
            assert_eq!(card.ease_factor, 2.5);
        }
        assert_eq!(svc.due_flashcards(Some(material)).unwrap().len(), 2);
    }

    #[test]
    fn test_generator_failure_propagates_and_saves_nothing() {
        let mut svc = service();
        let result = svc.generate_flashcards(&FailingGenerator, Uuid::new_v4(), "text", 5);
        assert!(matches!(result, Err(Error::Generator(GeneratorError::Backend(_)))));
        assert!(svc.flashcards(None).unwrap().is_empty());
    }

    #[test]
    fn test_stats_buckets() {
        let mut svc = service();
        let material = Uuid::new_v4();
        svc.add_flashcard(material, "q1".into(), "a".into(), 1).unwrap();
        svc.add_flashcard(material, "q2".into(), "a".into(), 3).unwrap();
        svc.add_flashcard(material, "q3".into(), "a".into(), 4).unwrap();
        let later = svc.add_flashcard(material, "q4".into(), "a".into(), 5).unwrap();
        let now = Utc::now();
        svc.review_flashcard_at(later.id, 5, now).unwrap();

        let stats = svc.stats_at(Some(material), now, &Utc).unwrap();
        assert_eq!(
            stats,
            DeckStats {
                total: 4,
                mastered: 1,
                learning: 1,
                difficult: 2,
                due_today: 3,
            }
        );
    }

    #[test]
    fn test_sessions_record_list_delete() {
        let mut svc = service();
        let material = Uuid::new_v4();
        let first = svc.record_session(material, 4, 10, 180).unwrap();
        let second = svc.record_session(material, 10, 10, 420).unwrap();

        assert_eq!(svc.sessions().unwrap(), vec![first.clone(), second.clone()]);
        svc.delete_session(first.id).unwrap();
        assert_eq!(svc.sessions().unwrap(), vec![second]);
    }

    #[test]
    fn test_deck_import_export() {
        let mut svc = service();
        let source = Uuid::new_v4();
        let target = Uuid::new_v4();
        let original = svc.add_flashcard(source, "hello".into(), "cześć".into(), 2).unwrap();
        svc.review_flashcard(original.id, 5).unwrap();

        let deck = svc.export_deck(source).unwrap();
        let imported = svc.import_deck(&deck, target).unwrap();
        assert_eq!(imported.len(), 1);
        assert_ne!(imported[0].id, original.id);
        assert_eq!(imported[0].difficulty_level, 2);
        assert_eq!(imported[0].repetition_count, 0);
        assert_eq!(imported[0].material_id, target);
    }

    #[test]
    fn test_delete_material_cascades_to_cards() {
        let mut svc = service();
        let material = svc.add_material(sample_material()).unwrap();
        svc.add_default_flashcard(material.id, "q".into(), "a".into()).unwrap();

        svc.delete_material(material.id).unwrap();
        assert!(svc.materials().unwrap().is_empty());
        assert!(svc.flashcards(None).unwrap().is_empty());
    }
}
