pub mod portal;
pub mod event;
pub mod outbound;
pub mod info;
pub mod login;
pub mod state;

pub use portal::{PortalKey, ThreadKind, ThreadId, UserId, MessageId};
pub use event::{
    EventMeta, EventSender, MediaAttachment, MediaKind, ReactionAction, RemoteEvent,
    RemoteEventKind, RemoteMessage, RemoteReaction, RemoteRemoval,
};
pub use outbound::{
    MessageResponse, OutboundContent, OutboundMessage, OutboundMsgType, OutboundReaction,
    OutboundReactionRemove, OutboundRemoval, ReactionPreResponse,
};
pub use info::{ChatInfo, ChatMember, Membership, RoomFeatures, RoomType, UserInfo};
pub use login::{LoginFlow, LoginMetadata, LoginStep};
pub use state::{BridgeState, StateEvent};
