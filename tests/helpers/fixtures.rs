//! Common YAML fixtures for tests.

pub const FIRE_SKILLS: &str = "\
## Sets the target ablaze
FireBall:
  Cooldown: 2
  Skills:
  - ignite{ticks=40} @Target
  - damage{amount=5} @Target
FireWall:
  Skills:
  - skill{s=FireBall} @PIR{r=5}
";

pub const IMP_MOBS: &str = "\
## A small fire demon
Imp:
  Type: BLAZE
  Health: 20
  Armor: 4
  DamageModifiers:
  - FIRE 0
  Skills:
  - skill{s=FireBall} @Target ~onAttack
";

pub const SUMMONER_SKILLS: &str = "\
Summoner:
  Skills:
  - summon{type=Imp;amount=2} @Self
";
