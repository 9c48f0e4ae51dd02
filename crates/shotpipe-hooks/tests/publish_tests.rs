use std::fs;
use std::path::Path;
use std::sync::Arc;

use shotpipe::{Template, TemplateKey};
use shotpipe_hooks::{
    latest_link_path, publish_secondary_tasks, version_up, CacheItem, CacheKind, HookError,
    MemoryRegistry, MemoryScene, PipelineConfig, PrimaryPublisher, PublishOutput, SceneAdapter,
    SecondaryTask, StaticPathSource,
};

fn work_template(root: &str) -> Template {
    Template::new(
        "shot_work",
        format!("{root}/wip/{{user}}/{{name}}_{{flag}}_v{{version}}.ma"),
        vec![
            TemplateKey::string("user"),
            TemplateKey::string("name"),
            TemplateKey::string("flag"),
            TemplateKey::integer("version", 3),
        ],
    )
    .unwrap()
}

fn publish_output(root: &str) -> PublishOutput {
    PublishOutput {
        name: "primary".to_string(),
        publish_template: Template::new(
            "shot_publish",
            format!("{root}/pub/v{{version}}/{{name}}-{{flag}}-v{{version}}.ma"),
            vec![
                TemplateKey::string("name"),
                TemplateKey::string("flag"),
                TemplateKey::integer("version", 3),
            ],
        )
        .unwrap(),
        published_file_type: "Maya Scene".to_string(),
    }
}

#[tokio::test]
async fn primary_publish_runs_the_whole_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_str().unwrap().to_string();

    let work = work_template(&root);
    let output = publish_output(&root);
    let mut scene = MemoryScene::new(format!("{root}/wip/alice/anim_wip_v001.ma"));
    let siblings = StaticPathSource::new(vec![
        format!("{root}/wip/alice/anim_wip_v001.ma"),
        format!("{root}/wip/bob/anim_wip_v004.ma"),
    ]);

    let registry = Arc::new(MemoryRegistry::new());
    let publisher = PrimaryPublisher::new(PipelineConfig::default(), registry.clone());

    let mut progress_log = Vec::new();
    let publish_path = publisher
        .publish(
            &mut scene,
            &work,
            &output,
            &siblings,
            "weekly publish",
            None,
            vec![],
            &mut |pct, msg| progress_log.push((pct, msg.to_string())),
        )
        .await
        .unwrap();

    // version 4 on disk, version 1 in memory: next is 5
    assert_eq!(publish_path, format!("{root}/pub/v005/anim-publi-v005.ma"));

    // work file was versioned up with the publish flag before the publish
    // save, and the scene ended on the publish path
    assert_eq!(
        scene.saved,
        vec![
            format!("{root}/wip/alice/anim_publi_v005.ma"),
            publish_path.clone(),
        ]
    );

    // the publish folder was created even though the adapter never touched
    // disk
    assert!(Path::new(&format!("{root}/pub/v005")).is_dir());

    let records = registry.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].request.name, "anim");
    assert_eq!(records[0].request.version, 5);
    assert_eq!(records[0].request.comment, "weekly publish");

    assert_eq!(progress_log.last().map(|(pct, _)| *pct), Some(100.0));
}

#[tokio::test]
async fn existing_publish_file_is_never_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_str().unwrap().to_string();

    let work = work_template(&root);
    let output = publish_output(&root);
    let mut scene = MemoryScene::new(format!("{root}/wip/alice/anim_wip_v001.ma"));
    let siblings = StaticPathSource::default();

    // version 1 in memory, nothing on disk: the publish would land on v002
    let colliding = format!("{root}/pub/v002/anim-publi-v002.ma");
    fs::create_dir_all(format!("{root}/pub/v002")).unwrap();
    fs::write(&colliding, b"already here").unwrap();

    let publisher = PrimaryPublisher::new(
        PipelineConfig::default(),
        Arc::new(MemoryRegistry::new()),
    );
    let err = publisher
        .publish(
            &mut scene,
            &work,
            &output,
            &siblings,
            "",
            None,
            vec![],
            &mut |_, _| {},
        )
        .await
        .unwrap_err();

    assert!(matches!(err, HookError::PublishExists { path } if path == colliding));
    assert!(scene.saved.is_empty());
}

#[tokio::test]
async fn scenes_outside_the_work_area_are_rejected() {
    let work = work_template("/show");
    let output = publish_output("/show");
    let mut scene = MemoryScene::new("/tmp/scratch/untracked.ma");

    let publisher = PrimaryPublisher::new(
        PipelineConfig::default(),
        Arc::new(MemoryRegistry::new()),
    );
    let err = publisher
        .publish(
            &mut scene,
            &work,
            &output,
            &StaticPathSource::default(),
            "",
            None,
            vec![],
            &mut |_, _| {},
        )
        .await
        .unwrap_err();

    assert!(matches!(err, HookError::InvalidWorkPath { .. }));
}

#[test]
fn version_up_saves_under_the_next_free_version() {
    let root = "/show".to_string();
    let work = work_template(&root);
    let mut scene = MemoryScene::new(format!("{root}/wip/alice/anim_wip_v002.ma"));
    let siblings = StaticPathSource::new(vec![
        format!("{root}/wip/alice/anim_wip_v002.ma"),
        format!("{root}/wip/alice/anim_wip_v007.ma"),
    ]);

    let config = PipelineConfig::default();
    let new_path = version_up(&mut scene, &work, &siblings, &config.vary_fields, &mut |_, _| {})
        .unwrap();

    assert_eq!(new_path, format!("{root}/wip/alice/anim_wip_v008.ma"));
    assert_eq!(scene.current_path().unwrap(), new_path);
}

/// Scene adapter that writes real files, like a host saving to disk
struct DiskScene {
    path: Option<String>,
}

impl SceneAdapter for DiskScene {
    fn current_path(&self) -> shotpipe_hooks::Result<String> {
        self.path
            .clone()
            .ok_or_else(|| HookError::Scene("no scene is currently open".to_string()))
    }

    fn save(&mut self) -> shotpipe_hooks::Result<()> {
        let path = self.current_path()?;
        fs::write(path, b"scene contents")?;
        Ok(())
    }

    fn save_as(&mut self, path: &str) -> shotpipe_hooks::Result<()> {
        fs::write(path, b"scene contents")?;
        self.path = Some(path.to_string());
        Ok(())
    }

    fn open(&mut self, path: &str) -> shotpipe_hooks::Result<()> {
        self.path = Some(path.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn publishes_saved_to_disk_get_a_latest_link() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_str().unwrap().to_string();

    let work = work_template(&root);
    let output = publish_output(&root);

    let scene_path = format!("{root}/wip/alice/anim_wip_v001.ma");
    fs::create_dir_all(format!("{root}/wip/alice")).unwrap();
    fs::write(&scene_path, b"scene contents").unwrap();
    let mut scene = DiskScene {
        path: Some(scene_path.clone()),
    };
    let siblings = StaticPathSource::new(vec![scene_path]);

    let config = PipelineConfig::default();
    let flag = config.publish_flag.clone();
    let publisher = PrimaryPublisher::new(config, Arc::new(MemoryRegistry::new()));
    let publish_path = publisher
        .publish(
            &mut scene,
            &work,
            &output,
            &siblings,
            "",
            None,
            vec![],
            &mut |_, _| {},
        )
        .await
        .unwrap();

    let link = latest_link_path(&publish_path, &flag);
    assert_eq!(link, format!("{root}/pub/anim.ma"));
    assert_eq!(fs::read(&link).unwrap(), b"scene contents");
}

#[tokio::test]
async fn secondary_failures_do_not_stop_sibling_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_str().unwrap().to_string();

    let work = work_template(&root);
    let scene_path = format!("{root}/wip/alice/anim_wip_v003.ma");
    let primary_path = format!("{root}/pub/v004/anim-publi-v004.ma");

    let cache_output = PublishOutput {
        name: "cache".to_string(),
        publish_template: Template::new(
            "shot_cache_publish",
            format!("{root}/caches/{{cache_type}}/{{cache_name}}_v{{version}}.abc"),
            vec![
                TemplateKey::string("cache_type"),
                TemplateKey::string("cache_name"),
                TemplateKey::integer("version", 3),
            ],
        )
        .unwrap(),
        published_file_type: "Alembic Cache".to_string(),
    };

    let tasks = vec![
        SecondaryTask {
            item: CacheItem {
                node: "oceanShape".to_string(),
                name: Some("oceanSim".to_string()),
                kind: CacheKind::Fluid,
            },
            output: cache_output.clone(),
        },
        SecondaryTask {
            // scanned item without a cache name: must fail, not guess
            item: CacheItem {
                node: "debrisShape".to_string(),
                name: None,
                kind: CacheKind::Particle,
            },
            output: cache_output.clone(),
        },
    ];

    let registry = MemoryRegistry::new();
    let failures = publish_secondary_tasks(
        tasks,
        &work,
        &scene_path,
        &primary_path,
        "cache publish",
        None,
        &registry,
        &mut |_, _| {},
    )
    .await
    .unwrap();

    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].task.item.node, "debrisShape");
    assert!(failures[0].errors[0].contains("cache_name"));

    let records = registry.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].request.path,
        format!("{root}/caches/mc/oceanSim_v003.abc")
    );
    assert_eq!(records[0].request.name, "anim");
    assert_eq!(records[0].request.dependency_paths, vec![primary_path]);
}
