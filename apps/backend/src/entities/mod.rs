pub mod actions;
pub mod game_players;
pub mod games;
pub mod lover_pairs;
pub mod players;
pub mod role_configs;
pub mod roles;

pub use actions::Entity as Actions;
pub use actions::Model as Action;
pub use actions::{ActionType, Phase, Visibility};
pub use game_players::Entity as GamePlayers;
pub use game_players::Model as GamePlayer;
pub use games::Entity as Games;
pub use games::GameStatus;
pub use games::Model as Game;
pub use lover_pairs::Entity as LoverPairs;
pub use players::Entity as Players;
pub use players::Model as Player;
pub use role_configs::Entity as RoleConfigs;
pub use roles::Entity as Roles;
pub use roles::Team;
