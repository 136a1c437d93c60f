//! The `vocabquiz init` command.

use std::path::Path;

use anyhow::Result;

use vocabquiz_core::config::sample_config;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("vocabquiz.toml"), &sample_config())?;

    std::fs::create_dir_all("vocabulary")?;
    write_if_missing(Path::new("vocabulary/spanish_beginner.toml"), SPANISH_BEGINNER)?;
    write_if_missing(Path::new("vocabulary/russian_beginner.toml"), RUSSIAN_BEGINNER)?;

    println!("\nNext steps:");
    println!("  1. Add word lists to vocabulary/");
    println!("  2. Run: vocabquiz validate");
    println!("  3. Run: vocabquiz play --user <name>");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SPANISH_BEGINNER: &str = r#"[vocabulary]
language = "spanish"
level = "beginner"

[[words]]
original = "Hola"
translation = "Hello"

[[words]]
original = "Amigo"
translation = "Friend"

[[words]]
original = "Rojo"
translation = "Red"

[[words]]
original = "Gato"
translation = "Cat"

[[words]]
original = "Perro"
translation = "Dog"

[[words]]
original = "Casa"
translation = "House"

[[words]]
original = "Agua"
translation = "Water"

[[words]]
original = "Libro"
translation = "Book"

[[words]]
original = "Sol"
translation = "Sun"

[[words]]
original = "Luna"
translation = "Moon"

[[words]]
original = "Pan"
translation = "Bread"

[[words]]
original = "Leche"
translation = "Milk"

[[words]]
original = "Verde"
translation = "Green"

[[words]]
original = "Azul"
translation = "Blue"

[[words]]
original = "Mesa"
translation = "Table"

[[words]]
original = "Gracias"
translation = "Thank you"
"#;

const RUSSIAN_BEGINNER: &str = r#"[vocabulary]
language = "russian"
level = "beginner"

[[words]]
original = "Привет"
translation = "Hello"

[[words]]
original = "Друг"
translation = "Friend"

[[words]]
original = "Красный"
translation = "Red"

[[words]]
original = "Кошка"
translation = "Cat"

[[words]]
original = "Собака"
translation = "Dog"

[[words]]
original = "Дом"
translation = "House"

[[words]]
original = "Вода"
translation = "Water"

[[words]]
original = "Книга"
translation = "Book"

[[words]]
original = "Солнце"
translation = "Sun"

[[words]]
original = "Луна"
translation = "Moon"

[[words]]
original = "Хлеб"
translation = "Bread"

[[words]]
original = "Молоко"
translation = "Milk"

[[words]]
original = "Зелёный"
translation = "Green"

[[words]]
original = "Синий"
translation = "Blue"

[[words]]
original = "Спасибо"
translation = "Thank you"
"#;
