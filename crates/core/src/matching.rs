//! Stable matching between two equally sized sides (proposers and receivers).

use std::collections::VecDeque;

use common::error::Error;

/// Complete preference lists for both sides, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub n: usize,
    pub proposers: Vec<Vec<usize>>,
    pub receivers: Vec<Vec<usize>>,
}

impl Preferences {
    /// Validates that each side has `n` lists, each a permutation of `0..n`.
    pub fn new(
        n: usize,
        proposers: Vec<Vec<usize>>,
        receivers: Vec<Vec<usize>>,
    ) -> Result<Self, Error> {
        validate_side("proposer", n, &proposers)?;
        validate_side("receiver", n, &receivers)?;
        Ok(Self {
            n,
            proposers,
            receivers,
        })
    }

    /// The same instance with the two sides' roles exchanged.
    pub fn swapped(&self) -> Self {
        Self {
            n: self.n,
            proposers: self.receivers.clone(),
            receivers: self.proposers.clone(),
        }
    }
}

fn validate_side(side: &str, n: usize, lists: &[Vec<usize>]) -> Result<(), Error> {
    if lists.len() != n {
        return Err(Error::InvalidPreferences(format!(
            "expected {} {} lists, found {}",
            n,
            side,
            lists.len()
        )));
    }
    for (owner, list) in lists.iter().enumerate() {
        let mut seen = vec![false; n];
        for &choice in list {
            if choice >= n || seen[choice] {
                return Err(Error::InvalidPreferences(format!(
                    "{} {} does not rank every member of the other side exactly once",
                    side, owner
                )));
            }
            seen[choice] = true;
        }
        if list.len() != n {
            return Err(Error::InvalidPreferences(format!(
                "{} {} ranks {} of {} members",
                side,
                owner,
                list.len(),
                n
            )));
        }
    }
    Ok(())
}

/// Rank tables: `ranks[i][j]` is the position of `j` in `prefs[i]`.
pub fn inverse_prefs(prefs: &[Vec<usize>]) -> Vec<Vec<usize>> {
    prefs
        .iter()
        .map(|list| {
            let mut ranks = vec![0; list.len()];
            for (position, &choice) in list.iter().enumerate() {
                ranks[choice] = position;
            }
            ranks
        })
        .collect()
}

/// A perfect matching, indexed by receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching {
    pub receiver_to_proposer: Vec<usize>,
}

impl Matching {
    /// `(proposer, receiver)` pairs in receiver order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.receiver_to_proposer
            .iter()
            .enumerate()
            .map(|(receiver, &proposer)| (proposer, receiver))
    }

    /// Proposer-indexed view; `None` for proposers left unmatched.
    pub fn proposer_to_receiver(&self) -> Vec<Option<usize>> {
        let mut partner = vec![None; self.receiver_to_proposer.len()];
        for (proposer, receiver) in self.pairs() {
            if let Some(slot) = partner.get_mut(proposer) {
                *slot = Some(receiver);
            }
        }
        partner
    }

    /// The same pairs seen from the other side.
    fn transposed(&self) -> Self {
        Self {
            receiver_to_proposer: self
                .proposer_to_receiver()
                .into_iter()
                .map(|r| r.unwrap_or(usize::MAX))
                .collect(),
        }
    }
}

/// Proposer-optimal stable matching (Gale-Shapley).
///
/// Free proposers are served first-in first-out; each proposes down its list
/// and receivers compare suitors through the rank table in O(1).
pub fn gale_shapley(prefs: &Preferences) -> Matching {
    let n = prefs.n;
    let receiver_ranks = inverse_prefs(&prefs.receivers);
    let mut next_choice = vec![0usize; n];
    let mut current: Vec<Option<usize>> = vec![None; n];
    let mut free: VecDeque<usize> = (0..n).collect();

    while let Some(proposer) = free.pop_front() {
        let receiver = prefs.proposers[proposer][next_choice[proposer]];
        next_choice[proposer] += 1;

        let holder = current[receiver];
        match holder {
            None => current[receiver] = Some(proposer),
            Some(held) if receiver_ranks[receiver][proposer] < receiver_ranks[receiver][held] => {
                current[receiver] = Some(proposer);
                free.push_back(held);
            }
            Some(_) => free.push_back(proposer),
        }
    }

    Matching {
        receiver_to_proposer: current.into_iter().flatten().collect(),
    }
}

/// True if `matching` pairs everybody and no proposer/receiver pair would both
/// rather be with each other than with their assigned partners.
pub fn is_stable(prefs: &Preferences, matching: &Matching) -> bool {
    let n = prefs.n;
    if matching.receiver_to_proposer.len() != n {
        return false;
    }
    let partner_of_proposer = matching.proposer_to_receiver();
    if partner_of_proposer.iter().any(Option::is_none)
        || matching.receiver_to_proposer.iter().any(|&p| p >= n)
    {
        return false;
    }

    let receiver_ranks = inverse_prefs(&prefs.receivers);

    for (proposer, list) in prefs.proposers.iter().enumerate() {
        let Some(assigned) = partner_of_proposer[proposer] else {
            return false;
        };
        // Receivers this proposer ranks above its partner.
        for &receiver in list.iter().take_while(|&&r| r != assigned) {
            let held = matching.receiver_to_proposer[receiver];
            if receiver_ranks[receiver][proposer] < receiver_ranks[receiver][held] {
                return false;
            }
        }
    }

    true
}

/// True if the instance has exactly one stable matching.
///
/// The proposer-optimal matching is receiver-pessimal and vice versa, so the
/// stable matching is unique exactly when both runs agree.
pub fn has_unique_stable_matching(prefs: &Preferences) -> bool {
    let proposer_optimal = gale_shapley(prefs);
    let receiver_optimal = gale_shapley(&prefs.swapped()).transposed();
    proposer_optimal == receiver_optimal
}
