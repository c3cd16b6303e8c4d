//! Non-geometric candidate filters shared by every selection mode.

use crate::candidate::Candidate;

use super::SelectionRequest;

/// Returns true if `candidate` survives the non-geometric filters of
/// `request`, applied in order:
///
/// 1. tokens without an actor
/// 2. hidden tokens, unconditionally
/// 3. stealthed tokens, unless stealth is ignored
/// 4. tokens already picked by an earlier N-target iteration
/// 5. faction scope (after the berserk override)
/// 6. the source's own tokens, when self-exclusion applies
pub fn is_eligible(request: &SelectionRequest, candidate: &Candidate) -> bool {
    let Some(actor) = &candidate.actor else {
        return false;
    };

    if candidate.is_hidden() {
        return false;
    }

    if candidate.stealthed && !request.ignore_stealth {
        return false;
    }

    if request.already_selected.contains(&candidate.id) {
        return false;
    }

    if !request
        .effective_scope()
        .admits(request.source_faction, candidate.faction)
    {
        return false;
    }

    if request.excludes_self() && request.source_actor.as_ref() == Some(actor) {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::{ActorId, TokenId};
    use crate::config::TargetType;
    use crate::faction::Faction;
    use crate::geometry::{Point, Size};

    fn candidate() -> Candidate {
        Candidate::new("t1", "a1", Point::ORIGIN, Size::square(100.0), Faction::Enemy)
    }

    fn request() -> SelectionRequest {
        SelectionRequest::new(TargetType::Area)
    }

    #[test]
    fn actorless_tokens_are_never_eligible() {
        let mut token = candidate();
        token.actor = None;
        assert!(!is_eligible(&request(), &token));
    }

    #[test]
    fn hidden_tokens_are_dropped_even_when_stealth_is_ignored() {
        let request = request().with_ignore_stealth(true);
        assert!(!is_eligible(&request, &candidate().with_hidden(true)));
        assert!(!is_eligible(&request, &candidate().with_visible(false)));
    }

    #[test]
    fn stealth_is_dropped_unless_ignored() {
        let token = candidate().with_stealth(true);
        assert!(!is_eligible(&request(), &token));
        assert!(is_eligible(&request().with_ignore_stealth(true), &token));
    }

    #[test]
    fn previously_selected_tokens_are_skipped() {
        let request = request().with_already_selected([TokenId::new("t1")].into());
        assert!(!is_eligible(&request, &candidate()));
    }

    #[test]
    fn self_exclusion_matches_owning_actor() {
        let request = request()
            .with_source(Some(ActorId::new("a1")), Faction::Enemy)
            .with_exclude_self(true);
        assert!(!is_eligible(&request, &candidate()));

        let without_source = self::request().with_exclude_self(true);
        assert!(is_eligible(&without_source, &candidate()));
    }
}
