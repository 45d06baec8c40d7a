/// Events emitted during a simulation step.
/// The game loop drains them every frame and writes them to the log.

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    CoinSpawned { id: u32, x: f32 },
    CoinCollected { id: u32, score: u32 },
    CoinMissed { id: u32 },
    Jumped,
    Landed,
    RoundEnded { score: u32 },
}
