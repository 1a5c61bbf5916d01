//! Wire data transfer objects.

pub mod history;

pub use history::{
    BlockDto, ChatDetailResponse, ConversationDto, ConversationListResponse, TurnDto,
};
