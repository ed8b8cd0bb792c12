use hidden_city::{
    GameConfig, Scene,
    config::CONFIG_FILE,
    scenes::{GameScene, MapScene, StartScene},
};

fn main() -> anyhow::Result<()> {
    let settings = GameConfig::load_or_default(CONFIG_FILE)?;
    let scenes: Vec<Box<dyn Scene>> = vec![
        Box::new(StartScene::new()),
        Box::new(MapScene::new()),
        Box::new(GameScene::new()),
    ];
    hidden_city::run(settings, scenes)
}
