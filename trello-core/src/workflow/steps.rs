// The nine-state board lifecycle:
// create-board -> create-list -> create-card-1 -> create-card-2 ->
// update-random-card -> delete-card-1 -> delete-card-2 -> delete-board -> done

use super::{Step, StepFuture};
use crate::client::{CardUpdate, TrelloClient};
use crate::config::ConfigStore;

const UPDATED_CARD_NAME: &str = "Trello Card Updated";
const UPDATED_CARD_COLOR: &str = "blue";

/// The ordered board-lifecycle chain. Each step consumes values from
/// the store, issues one HTTP call, and the create steps write the
/// returned `id` back under their step-specific key — only on success.
pub fn board_lifecycle() -> Vec<Step> {
    vec![
        Step::new("create-board", None, create_board),
        Step::new("create-list", Some("create-board"), create_list),
        Step::new("create-card-1", Some("create-list"), create_card_1),
        Step::new("create-card-2", Some("create-card-1"), create_card_2),
        Step::new(
            "update-random-card",
            Some("create-card-2"),
            update_random_card,
        ),
        Step::new("delete-card-1", Some("update-random-card"), delete_card_1),
        Step::new("delete-card-2", Some("delete-card-1"), delete_card_2),
        Step::new("delete-board", Some("delete-card-2"), delete_board),
    ]
}

/// Pick which stored card id the update step targets.
///
/// The draw is degenerate: flooring a `[0, 1)` sample scaled by one is
/// always zero, so `draw` is always 1 and `cardId1` wins on every run.
/// Whether a real coin flip was ever intended is unclear, so the
/// observed always-first-branch behavior is kept rather than widened.
pub fn pick_card_key() -> &'static str {
    let draw = (rand::random::<f64>() * 1.0) as u32 + 1;
    if draw == 1 {
        "cardId1"
    } else {
        "cardId2"
    }
}

fn create_board<'a>(store: &'a mut ConfigStore, client: &'a TrelloClient) -> StepFuture<'a> {
    Box::pin(async move {
        let name = store.get("boardName")?.to_string();
        let board = client.create_board(&name).await?;
        store.set("boardId", board.id);
        Ok(())
    })
}

fn create_list<'a>(store: &'a mut ConfigStore, client: &'a TrelloClient) -> StepFuture<'a> {
    Box::pin(async move {
        let name = store.get("listName")?.to_string();
        let board_id = store.get("boardId")?.to_string();
        let list = client.create_list(&name, &board_id).await?;
        store.set("listId", list.id);
        Ok(())
    })
}

fn create_card_1<'a>(store: &'a mut ConfigStore, client: &'a TrelloClient) -> StepFuture<'a> {
    Box::pin(async move {
        let name = store.get("cardName1")?.to_string();
        let list_id = store.get("listId")?.to_string();
        let card = client.create_card(&name, &list_id).await?;
        store.set("cardId1", card.id);
        Ok(())
    })
}

fn create_card_2<'a>(store: &'a mut ConfigStore, client: &'a TrelloClient) -> StepFuture<'a> {
    Box::pin(async move {
        let name = store.get("cardName2")?.to_string();
        let list_id = store.get("listId")?.to_string();
        let card = client.create_card(&name, &list_id).await?;
        store.set("cardId2", card.id);
        Ok(())
    })
}

fn update_random_card<'a>(store: &'a mut ConfigStore, client: &'a TrelloClient) -> StepFuture<'a> {
    Box::pin(async move {
        let card_id = store.get(pick_card_key())?.to_string();
        let update = CardUpdate {
            name: UPDATED_CARD_NAME.to_string(),
            color: UPDATED_CARD_COLOR.to_string(),
            id_list: store.get("listId")?.to_string(),
        };
        client.update_card(&card_id, &update).await?;
        Ok(())
    })
}

fn delete_card_1<'a>(store: &'a mut ConfigStore, client: &'a TrelloClient) -> StepFuture<'a> {
    Box::pin(async move {
        // id is read first: an unset key fails before any HTTP call
        let card_id = store.get("cardId1")?.to_string();
        client.delete_card(&card_id).await
    })
}

fn delete_card_2<'a>(store: &'a mut ConfigStore, client: &'a TrelloClient) -> StepFuture<'a> {
    Box::pin(async move {
        let card_id = store.get("cardId2")?.to_string();
        client.delete_card(&card_id).await
    })
}

fn delete_board<'a>(store: &'a mut ConfigStore, client: &'a TrelloClient) -> StepFuture<'a> {
    Box::pin(async move {
        let board_id = store.get("boardId")?.to_string();
        client.delete_board(&board_id).await
    })
}
