use model::{circuit::Circuit, WithId};
use utility::id::Id;

use crate::{repo::LeagueRepo, RequestResult};

/// All circuits, by name.
pub async fn load_circuits<R>(repo: &R) -> RequestResult<Vec<WithId<Circuit>>>
where
    R: LeagueRepo + ?Sized,
{
    let mut circuits = repo.circuits().await?;
    circuits.sort_by(|a, b| {
        a.content
            .name
            .to_lowercase()
            .cmp(&b.content.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(circuits)
}

pub async fn load_circuit<R>(repo: &R, id: Id<Circuit>) -> RequestResult<WithId<Circuit>>
where
    R: LeagueRepo + ?Sized,
{
    Ok(repo.circuit(id).await?)
}
